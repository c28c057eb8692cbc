//! Contract Test: GET /health

use crate::support::{create_test_app, get, send};
use axum::http::StatusCode;

#[tokio::test]
async fn health_reports_ok_with_version() {
    let (app, _state) = create_test_app().await;
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn cors_preflight_allows_dev_origin() {
    let (app, _state) = create_test_app().await;
    let request = axum::http::Request::builder()
        .method("OPTIONS")
        .uri("/api/posts")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );
}
