// src/handlers/report.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::Value;

use crate::{
    config::AppState,
    common::error::ApiError,
    handlers::companies::parse_companies,
    middleware::i18n::Locale,
    models::{company::CompanyList, report::ReportData},
    services::ReportService,
};

// GET /api/report
#[utoipa::path(
    get,
    path = "/api/report",
    tag = "Report",
    responses(
        (status = 200, description = "Relatório calculado a partir do arquivo salvo", body = ReportData),
        (status = 404, description = "Arquivo de empresas não encontrado")
    )
)]
pub async fn get_report(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state
        .report_service
        .from_store(chrono::Local::now().date_naive())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(report)))
}

// POST /api/report
#[utoipa::path(
    post,
    path = "/api/report",
    tag = "Report",
    request_body = CompanyList,
    responses(
        (status = 200, description = "Relatório calculado a partir do corpo", body = ReportData),
        (status = 400, description = "companies ausente ou inválido")
    )
)]
pub async fn build_report(
    locale: Locale,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let companies = parse_companies(body).map_err(|e| e.to_api_error(&locale))?;
    let report = ReportService::build(&companies, chrono::Local::now().date_naive());

    Ok((StatusCode::OK, Json(report)))
}
