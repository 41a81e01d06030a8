mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use std::sync::Arc;

use onchain_shortener::domain::repositories::UrlRegistry;

#[tokio::test]
async fn test_redirect_success() {
    let registry = common::memory_registry();
    registry
        .put("abc123", "https://example.com/landing", common::PAYER)
        .await
        .unwrap();
    let server = TestServer::new(common::app(common::create_test_state(registry))).unwrap();

    let response = server.get("/s/abc123").await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.header("location").to_str().unwrap(),
        "https://example.com/landing"
    );
}

#[tokio::test]
async fn test_redirect_not_found() {
    let server = TestServer::new(common::app(common::create_test_state(
        common::memory_registry(),
    )))
    .unwrap();

    let response = server.get("/s/nothere").await;

    response.assert_status_not_found();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["message"], "Short URL does not exist");
}

#[tokio::test]
async fn test_redirect_malformed_code_is_not_found() {
    let server = TestServer::new(common::app(common::create_test_state(
        common::memory_registry(),
    )))
    .unwrap();

    let response = server.get("/s/bad-code!").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_resolve_json() {
    let registry = common::memory_registry();
    registry
        .put("promo", "https://example.com", common::PAYER)
        .await
        .unwrap();
    let server = TestServer::new(common::app(common::create_test_state(registry))).unwrap();

    let response = server.get("/api/redirect/promo").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["success"], true);
    assert_eq!(json["originalUrl"], "https://example.com");
    assert_eq!(json["shortCode"], "promo");
}

#[tokio::test]
async fn test_resolve_is_case_sensitive() {
    let registry = common::memory_registry();
    registry
        .put("Promo", "https://example.com", common::PAYER)
        .await
        .unwrap();
    let server = TestServer::new(common::app(common::create_test_state(registry))).unwrap();

    server.get("/api/redirect/promo").await.assert_status_not_found();
    server.get("/api/redirect/Promo").await.assert_status_ok();
}

#[tokio::test]
async fn test_redirect_registry_down() {
    let server = TestServer::new(common::app(common::create_test_state(Arc::new(
        common::DownRegistry,
    ))))
    .unwrap();

    let response = server.get("/s/abc123").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "upstream_unavailable");
}
