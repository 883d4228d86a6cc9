//! Integration tests for the health endpoint.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_requires_no_token() {
    let app = helpers::TestApp::with_max_devices(5);
    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["store_available"], true);
    assert_eq!(response.body["max_devices"], 5);
    assert!(response.body["version"].is_string());
}

#[tokio::test]
async fn test_health_reports_degraded_store() {
    let app = helpers::TestApp::new();
    app.state.health.mark_unavailable();

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "degraded");
    assert_eq!(response.body["store_available"], false);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = helpers::TestApp::new();
    let response = app.request("GET", "/api/nope", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
