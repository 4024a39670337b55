// src/handlers/plants.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    analytics::plants::{overview, PlantFilter},
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::plant::PlantsOverview,
};

// GET /api/plants
#[utoipa::path(
    get,
    path = "/api/plants",
    tag = "Plants",
    params(PlantFilter),
    responses(
        (status = 200, description = "Fábricas filtradas com totais e gráficos", body = PlantsOverview),
        (status = 404, description = "Arquivo de fábricas não encontrado")
    )
)]
pub async fn list_plants(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(predicates): Query<PlantFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let file = app_state
        .plant_repo
        .load()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(overview(file, &predicates))))
}
