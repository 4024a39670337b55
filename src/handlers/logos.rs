// src/handlers/logos.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    services::logo_service::{LogoItem, LogoResult},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct SavedLogosResponse {
    pub saved: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveLogoBulkPayload {
    #[serde(default)]
    pub items: Vec<LogoItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaveLogoBulkResponse {
    pub results: Vec<LogoResult>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaveLogoResponse {
    pub ok: bool,
}

// GET /saved-logos
#[utoipa::path(
    get,
    path = "/saved-logos",
    tag = "Logos",
    responses(
        (status = 200, description = "IDs das empresas com logo salvo", body = SavedLogosResponse)
    )
)]
pub async fn saved_logos(State(app_state): State<AppState>) -> impl IntoResponse {
    let saved = app_state.logo_service.list_saved().await;
    (StatusCode::OK, Json(SavedLogosResponse { saved }))
}

// POST /save-logo
#[utoipa::path(
    post,
    path = "/save-logo",
    tag = "Logos",
    request_body = LogoItem,
    responses(
        (status = 200, description = "Logo gravado", body = SaveLogoResponse),
        (status = 400, description = "companyId ausente ou inválido"),
        (status = 500, description = "Nenhuma imagem utilizável")
    )
)]
pub async fn save_logo(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LogoItem>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(company_id), Some(image)) = (
        payload.company_id.filter(|id| !id.is_empty()),
        payload.image_data,
    ) else {
        return Err(AppError::MissingFields("companyId, imageData").to_api_error(&locale));
    };

    let saved = app_state
        .logo_service
        .save(&company_id, &image)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    if !saved {
        return Err(AppError::LogoSaveFailed.to_api_error(&locale));
    }

    Ok((StatusCode::OK, Json(SaveLogoResponse { ok: true })))
}

// POST /save-logo-bulk
#[utoipa::path(
    post,
    path = "/save-logo-bulk",
    tag = "Logos",
    request_body = SaveLogoBulkPayload,
    responses(
        (status = 200, description = "Resultado por empresa", body = SaveLogoBulkResponse)
    )
)]
pub async fn save_logo_bulk(
    State(app_state): State<AppState>,
    Json(payload): Json<SaveLogoBulkPayload>,
) -> impl IntoResponse {
    let results = app_state.logo_service.save_bulk(&payload.items).await;
    (StatusCode::OK, Json(SaveLogoBulkResponse { results }))
}
