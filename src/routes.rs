// src/routes.rs

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn build_router(app_state: AppState) -> Router {
    // O dashboard é estático e roda em outra origem
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health::health))
        .route("/api/companies", get(handlers::companies::list_companies))
        .route("/save-companies", post(handlers::companies::save_companies))
        .route("/api/plants", get(handlers::plants::list_plants))
        .route(
            "/api/report",
            get(handlers::report::get_report).post(handlers::report::build_report),
        )
        .route("/download-pdf", post(handlers::documents::download_pdf))
        .route("/send-email", post(handlers::email::send_email))
        .route("/saved-logos", get(handlers::logos::saved_logos))
        .route("/save-logo", post(handlers::logos::save_logo))
        .route("/save-logo-bulk", post(handlers::logos::save_logo_bulk))
        .layer(cors)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_config(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            bind_addr: "127.0.0.1:0".into(),
            companies_file: dir.join("companies.json"),
            plants_file: dir.join("plants.json"),
            logos_dir: dir.join("logos"),
            fonts_dir: dir.join("fonts"),
            font_family: "Missing".into(),
            resend_api_key: None,
            resend_from: "onboarding@resend.dev".into(),
            resend_url: "http://127.0.0.1:9/emails".into(),
            http_timeout: Duration::from_secs(1),
        }
    }

    fn app(dir: &std::path::Path) -> Router {
        build_router(AppState::new(&test_config(dir)).unwrap())
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT_LANGUAGE, "en-US")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn companies() -> Value {
        json!({
            "companies": [
                { "id": "a", "name": "Alpha", "status": "כן", "industry": "ביטוח",
                  "emailSent": true, "meetingHeld": true, "agreementSent": true,
                  "agreementSigned": true, "paid": true, "cohort": 2 },
                { "id": "b", "name": "Beta", "status": "טרם הוחלט", "industry": "מזון",
                  "emailSent": true, "meetingHeld": true },
                { "id": "c", "name": "Gamma", "status": "לא", "emailSent": true }
            ]
        })
    }

    #[tokio::test]
    async fn health_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = send(app(dir.path()), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn save_then_query_companies() {
        let dir = tempfile::tempdir().unwrap();

        let (status, body) = send(app(dir.path()), "POST", "/save-companies", Some(companies())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true, "count": 3 }));

        let (status, body) = send(app(dir.path()), "GET", "/api/companies?status=%D7%9B%D7%9F", None).await;
        assert_eq!(status, StatusCode::OK);
        let listed = body["companies"].as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["id"], "a");
        assert_eq!(listed[0]["recruitmentStatus"], "הצטרפו ושילמו");
    }

    #[tokio::test]
    async fn save_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = send(app(dir.path()), "POST", "/save-companies", Some(json!({ "companies": 1 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "companies must be an array");
    }

    #[tokio::test]
    async fn missing_store_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _) = send(app(dir.path()), "GET", "/api/report", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn plants_are_filtered_and_summed() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _) = send(app(dir.path()), "GET", "/api/plants", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let plants = json!({
            "plants": [
                { "id": "p1", "name": "א", "stage": "פיילוט", "geography": "עוטף עזה", "sector": "מזון",
                  "totalParticipants": 10, "totalSessions": 3, "ceoCount": 1, "hrManagerCount": 1 },
                { "id": "p2", "name": "ב", "stage": "תכנית רחבה", "geography": "גליל עליון", "sector": "מזון",
                  "totalParticipants": 4, "totalSessions": 2, "ceoCount": 1, "hrManagerCount": 0 }
            ],
            "timeline": { "2024-01": { "mgmt": 1, "midMgmt": 2, "workers": 3 } }
        });
        std::fs::write(dir.path().join("plants.json"), plants.to_string()).unwrap();

        // geography=גליל עליון
        let uri = "/api/plants?geography=%D7%92%D7%9C%D7%99%D7%9C%20%D7%A2%D7%9C%D7%99%D7%95%D7%9F";
        let (status, body) = send(app(dir.path()), "GET", uri, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["isFiltered"], true);
        assert_eq!(body["plants"].as_array().unwrap().len(), 1);
        assert_eq!(
            body["summary"],
            json!({ "totalPlants": 1, "totalParticipants": 4, "totalSessions": 2, "totalCEOs": 1, "totalHRManagers": 0 })
        );
        assert_eq!(body["options"]["geographies"], json!(["הכל", "עוטף עזה", "גליל עליון"]));
        assert_eq!(body["timeline"]["2024-01"]["workers"], 3.0);
    }

    #[tokio::test]
    async fn report_from_body() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = send(app(dir.path()), "POST", "/api/report", Some(companies())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["joined"], 1);
        assert_eq!(body["statusCounts"]["טרם הוחלט"], 1);
        assert_eq!(body["industryCounts"]["פיננסים וביטוח"], 1);
        assert_eq!(body["undecidedList"], json!(["Beta"]));
        assert_eq!(body["funnel"]["stageCounts"], json!([3, 2, 1, 1, 1]));
    }

    #[tokio::test]
    async fn pdf_without_fonts_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = send(app(dir.path()), "POST", "/download-pdf", Some(companies())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().starts_with("PDF generation failed"));
    }

    #[tokio::test]
    async fn email_requires_fields_and_a_key() {
        let dir = tempfile::tempdir().unwrap();

        let (status, _) = send(app(dir.path()), "POST", "/send-email", Some(json!({ "to": "a@x.test" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut payload = companies();
        payload["to"] = json!("a@x.test");
        payload["subject"] = json!("דוח");
        let (status, body) = send(app(dir.path()), "POST", "/send-email", Some(payload)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "RESEND_API_KEY not configured.");
    }

    #[tokio::test]
    async fn email_goes_out_without_pdf_when_fonts_are_missing() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "em_1" })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.resend_api_key = Some("re_live_key".into());
        config.resend_url = format!("{}/emails", server.uri());
        let app = build_router(AppState::new(&config).unwrap());

        let mut payload = companies();
        payload["to"] = json!(["a@x.test", "b@x.test"]);
        payload["subject"] = json!("דוח");
        let (status, body) = send(app, "POST", "/send-email", Some(payload)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true, "id": "em_1", "hasPdf": false }));

        let requests = server.received_requests().await.unwrap();
        let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(sent["to"], json!(["a@x.test", "b@x.test"]));
        assert!(sent.get("attachments").is_none());
        assert!(sent["html"].as_str().unwrap().contains("Beta"));
    }

    #[tokio::test]
    async fn logo_roundtrip() {
        let dir = tempfile::tempdir().unwrap();

        let (status, _) = send(
            app(dir.path()),
            "POST",
            "/save-logo",
            Some(json!({ "companyId": "a", "imageData": "data:image/png;base64,cG5nIQ==" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(app(dir.path()), "POST", "/save-logo", Some(json!({ "imageData": "data:," }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("companyId"));

        let (status, body) = send(
            app(dir.path()),
            "POST",
            "/save-logo",
            Some(json!({ "companyId": "b", "imageData": { "candidateFile": "none.png" } })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to save");

        let (_, body) = send(app(dir.path()), "GET", "/saved-logos", None).await;
        assert_eq!(body, json!({ "saved": ["a"] }));
    }

    #[tokio::test]
    async fn bulk_logo_results() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = send(
            app(dir.path()),
            "POST",
            "/save-logo-bulk",
            Some(json!({ "items": [
                { "companyId": "a", "imageData": "data:image/png;base64,cG5nIQ==" },
                { "companyId": "b", "imageData": { "candidateFile": "none.png" } }
            ] })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "results": [ { "companyId": "a", "ok": true }, { "companyId": "b", "ok": false } ] })
        );
    }
}
