//! Integration tests for health check endpoints

mod common;

use axum::http::StatusCode;

#[tokio::test]
#[ignore = "requires database"]
async fn test_health_endpoint() {
    let app = common::TestApp::new().await;

    let (status, body) = app.request(axum::http::Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_readiness_reports_dependencies() {
    let app = common::TestApp::new().await;

    let (status, body) = app
        .request(axum::http::Method::GET, "/health/ready", None, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"]["healthy"], true);
    assert_eq!(body["checks"]["media"]["healthy"], true);
}
