// src/handlers/documents.rs

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::{
    common::error::ApiError,
    config::AppState,
    handlers::companies::parse_companies,
    middleware::i18n::Locale,
    models::company::CompanyList,
    services::ReportService,
};

// POST /download-pdf
#[utoipa::path(
    post,
    path = "/download-pdf",
    tag = "Documents",
    request_body = CompanyList,
    responses(
        (status = 200, description = "Relatório em PDF", content_type = "application/pdf"),
        (status = 400, description = "companies ausente ou inválido"),
        (status = 500, description = "Falha ao gerar o PDF")
    )
)]
pub async fn download_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let companies = parse_companies(body).map_err(|e| e.to_api_error(&locale))?;

    let today = chrono::Local::now().date_naive();
    let report = ReportService::build(&companies, today);

    let pdf_bytes = app_state
        .document_service
        .generate_report_pdf(report)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    // Configura os Headers para o navegador baixar o PDF
    let disposition = format!(
        "attachment; filename=\"shaveh-report.pdf\"; filename*=UTF-8''shaveh-report-{}.pdf",
        today.format("%Y-%m-%d")
    );
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (header::CONTENT_DISPOSITION, disposition),
    ];

    Ok((headers, pdf_bytes).into_response())
}
