// src/handlers/health.rs

use axum::{response::IntoResponse, Json};
use serde_json::json;

// GET /health
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Servidor no ar"))
)]
pub async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}
