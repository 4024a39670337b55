// src/handlers/email.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::companies::parse_companies,
    middleware::i18n::Locale,
    services::{email_service::build_email_html, ReportService},
};

/// Destinatário único ou lista.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    One(String),
    Many(Vec<String>),
}

impl Recipients {
    pub fn into_vec(self) -> Vec<String> {
        let all = match self {
            Recipients::One(to) => vec![to],
            Recipients::Many(to) => to,
        };
        all.into_iter()
            .map(|to| to.trim().to_string())
            .filter(|to| !to.is_empty())
            .collect()
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailPayload {
    #[schema(value_type = Option<Vec<String>>)]
    pub to: Option<Recipients>,
    pub reply_to: Option<String>,
    pub subject: Option<String>,
    /// Mensagem em HTML do editor de texto rico
    pub body_html: Option<String>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub companies: Option<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    pub ok: bool,
    pub id: String,
    pub has_pdf: bool,
}

// POST /send-email
#[utoipa::path(
    post,
    path = "/send-email",
    tag = "Email",
    request_body = SendEmailPayload,
    responses(
        (status = 200, description = "E-mail enviado", body = SendEmailResponse),
        (status = 400, description = "Campos obrigatórios ausentes"),
        (status = 500, description = "Resend não configurado ou envio recusado")
    )
)]
pub async fn send_email(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<SendEmailPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to = payload.to.map(Recipients::into_vec).unwrap_or_default();
    let subject = payload.subject.filter(|s| !s.trim().is_empty());

    let (Some(subject), Some(companies)) = (subject, payload.companies) else {
        return Err(AppError::MissingFields("to, subject, companies").to_api_error(&locale));
    };
    if to.is_empty() {
        return Err(AppError::MissingFields("to, subject, companies").to_api_error(&locale));
    }

    // Sem chave não adianta gerar o PDF
    app_state
        .email_service
        .ensure_configured()
        .map_err(|e| e.to_api_error(&locale))?;

    let companies = parse_companies(json!({ "companies": companies }))
        .map_err(|e| e.to_api_error(&locale))?;
    let report = ReportService::build(&companies, chrono::Local::now().date_naive());

    let html = build_email_html(payload.body_html.as_deref().unwrap_or_default(), &report);
    let mut email = app_state
        .email_service
        .compose(to, payload.reply_to, subject, html);

    // Sem PDF o e-mail sai mesmo assim, só sem anexo
    let filename = format!("דוח-שווה-{}.pdf", report.date);
    match app_state.document_service.generate_report_pdf(report).await {
        Ok(pdf) => email.attach_pdf(filename, &pdf),
        Err(e) => tracing::warn!("PDF falhou, enviando sem anexo: {}", e),
    }

    let id = app_state
        .email_service
        .send(&email)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((
        StatusCode::OK,
        Json(SendEmailResponse {
            ok: true,
            id,
            has_pdf: email.has_attachment(),
        }),
    ))
}
