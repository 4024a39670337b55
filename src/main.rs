//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod analytics;
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;

use crate::config::{AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG sobrescreve o nível padrão
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = AppConfig::from_env()?;
    let app_state = AppState::new(&config)?;

    tracing::info!("📁 Empresas em {}", config.companies_file.display());
    tracing::info!("🏭 Fábricas em {}", config.plants_file.display());
    tracing::info!("🖼️ Logos em {}", config.logos_dir.display());

    let app = routes::build_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
