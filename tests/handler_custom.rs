mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use onchain_shortener::domain::repositories::UrlRegistry;

#[tokio::test]
async fn test_custom_shorten_success() {
    let registry = common::memory_registry();
    let server = TestServer::new(common::app(common::create_test_state(registry.clone()))).unwrap();

    let response = server
        .post("/api/shorten/custom")
        .json(&json!({ "url": "https://example.com", "customCode": "promo2025" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["shortCode"], "promo2025");
    assert_eq!(json["custom"], true);
    assert_eq!(json["shortUrl"], "http://localhost:3000/s/promo2025");

    let record = registry.get("promo2025").await.unwrap().unwrap();
    assert_eq!(record.original_url, "https://example.com");
}

#[tokio::test]
async fn test_custom_code_taken() {
    let registry = common::memory_registry();
    registry
        .put("taken", "https://first.com", common::PAYER)
        .await
        .unwrap();
    let server = TestServer::new(common::app(common::create_test_state(registry.clone()))).unwrap();

    let response = server
        .post("/api/shorten/custom")
        .json(&json!({ "url": "https://second.com", "customCode": "taken" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "conflict");
    assert_eq!(json["error"]["message"], "This custom code is already taken");

    let record = registry.get("taken").await.unwrap().unwrap();
    assert_eq!(record.original_url, "https://first.com");
}

#[tokio::test]
async fn test_custom_codes_are_case_sensitive() {
    let registry = common::memory_registry();
    let server = TestServer::new(common::app(common::create_test_state(registry.clone()))).unwrap();

    for code in ["Promo", "promo"] {
        server
            .post("/api/shorten/custom")
            .json(&json!({ "url": "https://example.com", "customCode": code }))
            .await
            .assert_status_ok();
    }

    assert_eq!(registry.len().await, 2);
}

#[tokio::test]
async fn test_custom_code_invalid_format_leaves_registry_untouched() {
    let registry = common::memory_registry();
    let server = TestServer::new(common::app(common::create_test_state(registry.clone()))).unwrap();

    for code in ["ab", "my-code", "has space", "abcdefghijklmnopqrstu"] {
        let response = server
            .post("/api/shorten/custom")
            .json(&json!({ "url": "https://example.com/x", "customCode": code }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["error"]["code"], "validation_error", "{code}");
    }

    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn test_custom_code_missing() {
    let server = TestServer::new(common::app(common::create_test_state(
        common::memory_registry(),
    )))
    .unwrap();

    let response = server
        .post("/api/shorten/custom")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_custom_info_lists_rules() {
    let server = TestServer::new(common::app(common::create_test_state(
        common::memory_registry(),
    )))
    .unwrap();

    let response = server.get("/api/shorten/custom").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["rules"]["minLength"], 3);
    assert_eq!(json["rules"]["maxLength"], 20);
    assert_eq!(json["rules"]["caseSensitive"], true);
}
