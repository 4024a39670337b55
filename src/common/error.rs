use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Campos obrigatórios ausentes: {0}")]
    MissingFields(&'static str),

    #[error("companies deve ser um array")]
    CompaniesNotArray,

    #[error("Arquivo de empresas não encontrado: {0}")]
    CompaniesFileNotFound(String),

    #[error("Arquivo de fábricas não encontrado: {0}")]
    PlantsFileNotFound(String),

    #[error("companyId inválido: {0}")]
    InvalidCompanyId(String),

    #[error("Falha ao salvar o logo")]
    LogoSaveFailed,

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro ao gerar PDF: {0}")]
    PdfError(String),

    #[error("RESEND_API_KEY não configurada")]
    EmailNotConfigured,

    #[error("Resend recusou o envio: {0}")]
    EmailRejected(String),

    #[error("Erro de I/O: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON inválido: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Erro HTTP: {0}")]
    HttpError(#[from] reqwest::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl From<genpdf::error::Error> for AppError {
    fn from(e: genpdf::error::Error) -> Self {
        AppError::PdfError(e.to_string())
    }
}

/// Erro já traduzido, pronto para virar resposta HTTP.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::MissingFields(_)
            | AppError::CompaniesNotArray
            | AppError::InvalidCompanyId(_)
            | AppError::JsonError(_) => StatusCode::BAD_REQUEST,
            AppError::CompaniesFileNotFound(_) | AppError::PlantsFileNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_api_error(self, locale: &Locale) -> ApiError {
        let status = self.status();
        let he = locale.is_hebrew();

        let (message, details) = match &self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| e.message.as_ref().map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string()))
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                let message = if he { "שדה אחד או יותר אינו תקין." } else { "One or more fields are invalid." };
                (message.to_string(), Some(Value::Object(details)))
            }
            AppError::MissingFields(fields) => {
                let message = if he {
                    format!("חסרים שדות חובה: {fields}")
                } else {
                    format!("Missing required fields: {fields}")
                };
                (message, None)
            }
            AppError::CompaniesNotArray => ("companies must be an array".to_string(), None),
            AppError::JsonError(e) => {
                let message = if he { format!("JSON לא תקין: {e}") } else { format!("Invalid JSON: {e}") };
                (message, None)
            }
            AppError::InvalidCompanyId(id) => (format!("Invalid companyId: {id}"), None),
            AppError::CompaniesFileNotFound(_) => {
                let message = if he { "קובץ החברות לא נמצא." } else { "Companies file not found." };
                (message.to_string(), None)
            }
            AppError::PlantsFileNotFound(_) => {
                let message = if he { "קובץ המפעלים לא נמצא." } else { "Plants file not found." };
                (message.to_string(), None)
            }
            AppError::LogoSaveFailed => ("Failed to save".to_string(), None),
            AppError::EmailNotConfigured => {
                let message = if he { "RESEND_API_KEY לא מוגדר." } else { "RESEND_API_KEY not configured." };
                (message.to_string(), None)
            }
            AppError::EmailRejected(reason) => {
                let message = if reason.is_empty() {
                    "שגיאה בשליחת המייל".to_string()
                } else {
                    reason.clone()
                };
                (message, None)
            }
            AppError::FontNotFound(_) | AppError::PdfError(_) => {
                tracing::error!("Erro ao gerar PDF: {}", self);
                let message = if he { format!("שגיאה ביצירת PDF: {self}") } else { format!("PDF generation failed: {self}") };
                (message, None)
            }
            // O resto vira 500 genérico; o detalhe fica só no log
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                let message = if he { "אירעה שגיאה בלתי צפויה." } else { "An unexpected error occurred." };
                (message.to_string(), None)
            }
        };

        ApiError { status, message, details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}
