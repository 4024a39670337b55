// src/handlers/companies.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    analytics::filter::{filter, CompanyFilter},
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::company::{Company, CompanyList},
    services::ReportService,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct SaveCompaniesResponse {
    pub ok: bool,
    pub count: usize,
}

/// Lê `{ "companies": [...] }` de um corpo arbitrário. Usado por todas as
/// rotas que recebem a lista do dashboard.
pub fn parse_companies(body: Value) -> Result<Vec<Company>, AppError> {
    let Value::Object(mut body) = body else {
        return Err(AppError::CompaniesNotArray);
    };
    let companies = body.remove("companies").unwrap_or(Value::Null);
    if !companies.is_array() {
        return Err(AppError::CompaniesNotArray);
    }

    let list = CompanyList {
        companies: serde_json::from_value(companies)?,
    };
    list.validate()?;

    Ok(list.companies)
}

// GET /api/companies
#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "Companies",
    params(CompanyFilter),
    responses(
        (status = 200, description = "Empresas do arquivo, filtradas", body = CompanyList),
        (status = 404, description = "Arquivo de empresas não encontrado")
    )
)]
pub async fn list_companies(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(predicates): Query<CompanyFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let companies = app_state
        .company_repo
        .load_all()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let filtered: Vec<Company> = filter(&companies, &predicates).into_iter().cloned().collect();

    Ok((
        StatusCode::OK,
        Json(CompanyList {
            companies: ReportService::with_recruitment_status(filtered),
        }),
    ))
}

// POST /save-companies
#[utoipa::path(
    post,
    path = "/save-companies",
    tag = "Companies",
    request_body = CompanyList,
    responses(
        (status = 200, description = "Arquivo regravado por inteiro", body = SaveCompaniesResponse),
        (status = 400, description = "companies ausente, não é array ou inválido")
    )
)]
pub async fn save_companies(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let companies = parse_companies(body).map_err(|e| e.to_api_error(&locale))?;

    let count = app_state
        .company_repo
        .save_all(companies)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!("{} empresas salvas em {}", count, app_state.company_repo.path().display());

    Ok((StatusCode::OK, Json(SaveCompaniesResponse { ok: true, count })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_missing_or_non_array_companies() {
        assert!(matches!(parse_companies(json!({})), Err(AppError::CompaniesNotArray)));
        assert!(matches!(parse_companies(json!({ "companies": {} })), Err(AppError::CompaniesNotArray)));
        assert!(matches!(parse_companies(json!([1, 2])), Err(AppError::CompaniesNotArray)));
    }

    #[test]
    fn validates_each_company() {
        let err = parse_companies(json!({ "companies": [{ "id": "", "name": "x" }] })).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn accepts_an_empty_list() {
        assert!(parse_companies(json!({ "companies": [] })).unwrap().is_empty());
    }
}
