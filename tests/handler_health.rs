mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use std::sync::Arc;

#[tokio::test]
async fn test_health_check_healthy() {
    let server = TestServer::new(common::app(common::create_test_state(
        common::memory_registry(),
    )))
    .unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["registry"]["status"], "ok");
    assert_eq!(json["checks"]["payments"]["status"], "disabled");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_health_check_reports_payments() {
    let state = common::create_paid_state(
        common::memory_registry(),
        common::StubFacilitator::new(common::FacilitatorMode::Accept),
    );
    let server = TestServer::new(common::app(state)).unwrap();

    let json = server.get("/health").await.json::<serde_json::Value>();

    assert_eq!(json["checks"]["payments"]["status"], "ok");
    assert_eq!(json["checks"]["payments"]["message"], "Enabled (base-sepolia)");
}

#[tokio::test]
async fn test_health_check_registry_down() {
    let server = TestServer::new(common::app(common::create_test_state(Arc::new(
        common::DownRegistry,
    ))))
    .unwrap();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["registry"]["status"], "error");
}
