// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Companies ---
        handlers::companies::list_companies,
        handlers::companies::save_companies,

        // --- Plants ---
        handlers::plants::list_plants,

        // --- Report ---
        handlers::report::get_report,
        handlers::report::build_report,

        // --- Documents ---
        handlers::documents::download_pdf,

        // --- Email ---
        handlers::email::send_email,

        // --- Logos ---
        handlers::logos::saved_logos,
        handlers::logos::save_logo,
        handlers::logos::save_logo_bulk,
    ),
    components(
        schemas(
            // --- Companies ---
            models::company::Company,
            models::company::CompanyList,
            models::company::Process,
            models::company::Outcomes,
            models::company::StepStatus,
            models::company::Phase,
            handlers::companies::SaveCompaniesResponse,

            // --- Plants ---
            models::plant::Plant,
            models::plant::TimelineEntry,
            models::plant::PlantSummary,
            models::plant::PlantFilterOptions,
            models::plant::PlantsOverview,

            // --- Report ---
            models::report::ReportData,
            models::report::Stage,
            models::report::FunnelStats,
            models::report::Bottleneck,
            models::report::JoinRate,
            models::report::StatusCounts,
            models::report::EngagementTier,
            models::report::TierCount,
            models::report::StepStats,
            models::report::PhaseStats,
            models::report::PhaseCompletion,
            models::report::CompanyRef,
            models::report::CohortSummary,
            models::report::PipelineTotals,

            // --- Email ---
            handlers::email::SendEmailPayload,
            handlers::email::SendEmailResponse,

            // --- Logos ---
            services::logo_service::LogoItem,
            services::logo_service::LogoResult,
            handlers::logos::SavedLogosResponse,
            handlers::logos::SaveLogoResponse,
            handlers::logos::SaveLogoBulkPayload,
            handlers::logos::SaveLogoBulkResponse,
        )
    ),
    tags(
        (name = "Health", description = "Verificação do servidor"),
        (name = "Companies", description = "Leitura e gravação do arquivo de empresas"),
        (name = "Plants", description = "Painel de resiliência das fábricas"),
        (name = "Report", description = "Indicadores do recrutamento e do processo"),
        (name = "Documents", description = "Relatório em PDF"),
        (name = "Email", description = "Envio do relatório por e-mail (Resend)"),
        (name = "Logos", description = "Logos das empresas")
    )
)]
pub struct ApiDoc;
