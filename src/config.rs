// src/config.rs

use std::{env, path::PathBuf, time::Duration};

use anyhow::Context;

use crate::{
    db::{CompanyRepository, LogoRepository, PlantRepository},
    services::{DocumentService, EmailService, LogoService, ReportService},
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub companies_file: PathBuf,
    pub plants_file: PathBuf,
    pub logos_dir: PathBuf,
    pub fonts_dir: PathBuf,
    pub font_family: String,
    pub resend_api_key: Option<String>,
    pub resend_from: String,
    pub resend_url: String,
    pub http_timeout: Duration,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let timeout_secs: u64 = var_or("HTTP_TIMEOUT_SECS", "30")
            .parse()
            .context("HTTP_TIMEOUT_SECS deve ser um número inteiro de segundos")?;

        Ok(Self {
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:3457"),
            companies_file: var_or("COMPANIES_FILE", "data/companies.json").into(),
            plants_file: var_or("PLANTS_FILE", "data/plants.json").into(),
            logos_dir: var_or("LOGOS_DIR", "public/logos").into(),
            fonts_dir: var_or("FONTS_DIR", "./fonts").into(),
            font_family: var_or("FONT_FAMILY", "NotoSansHebrew"),
            resend_api_key: env::var("RESEND_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            resend_from: var_or("RESEND_FROM", "onboarding@resend.dev"),
            resend_url: var_or("RESEND_URL", "https://api.resend.com/emails"),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub company_repo: CompanyRepository,
    pub plant_repo: PlantRepository,
    pub report_service: ReportService,
    pub document_service: DocumentService,
    pub email_service: EmailService,
    pub logo_service: LogoService,
}

impl AppState {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .context("Falha ao criar o cliente HTTP")?;

        // --- Monta o gráfico de dependências ---
        let company_repo = CompanyRepository::new(&config.companies_file);
        let logo_repo = LogoRepository::new(&config.logos_dir);

        if config.resend_api_key.is_none() {
            tracing::warn!("RESEND_API_KEY não definida: /send-email vai responder 500");
        }

        Ok(Self {
            report_service: ReportService::new(company_repo.clone()),
            document_service: DocumentService::new(&config.fonts_dir, &config.font_family, logo_repo.clone()),
            email_service: EmailService::new(
                http.clone(),
                config.resend_api_key.clone(),
                config.resend_from.clone(),
                config.resend_url.clone(),
            ),
            logo_service: LogoService::new(logo_repo, http),
            plant_repo: PlantRepository::new(&config.plants_file),
            company_repo,
        })
    }
}
