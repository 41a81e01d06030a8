mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use common::{FacilitatorMode, StubFacilitator};
use onchain_shortener::domain::repositories::UrlRegistry;

#[tokio::test]
async fn test_missing_payment_header_returns_requirements() {
    let registry = common::memory_registry();
    let facilitator = StubFacilitator::new(FacilitatorMode::Accept);
    let server = TestServer::new(common::app(common::create_paid_state(
        registry.clone(),
        facilitator.clone(),
    )))
    .unwrap();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::PAYMENT_REQUIRED);

    let json = response.json::<serde_json::Value>();
    let accepts = &json["accepts"][0];
    assert_eq!(json["x402Version"], 1);
    assert_eq!(json["error"], "X-PAYMENT header is required");
    assert_eq!(accepts["scheme"], "exact");
    assert_eq!(accepts["network"], "base-sepolia");
    assert_eq!(accepts["maxAmountRequired"], "1000");
    assert_eq!(accepts["payTo"], common::PAY_TO);
    assert_eq!(accepts["resource"], "http://localhost:3000/api/shorten");
    assert_eq!(accepts["extra"]["name"], "USDC");

    assert_eq!(facilitator.verify_calls(), 0);
    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn test_malformed_payment_header() {
    let facilitator = StubFacilitator::new(FacilitatorMode::Accept);
    let server = TestServer::new(common::app(common::create_paid_state(
        common::memory_registry(),
        facilitator.clone(),
    )))
    .unwrap();

    let response = server
        .post("/api/shorten")
        .add_header("x-payment", "%%%not-base64%%%")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::PAYMENT_REQUIRED);
    assert_eq!(facilitator.verify_calls(), 0);
}

#[tokio::test]
async fn test_rejected_payment_leaves_registry_untouched() {
    let registry = common::memory_registry();
    let facilitator = StubFacilitator::new(FacilitatorMode::RejectPayment);
    let server = TestServer::new(common::app(common::create_paid_state(
        registry.clone(),
        facilitator.clone(),
    )))
    .unwrap();

    let response = server
        .post("/api/shorten")
        .add_header("x-payment", common::payment_header())
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::PAYMENT_REQUIRED);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"], "insufficient_funds");
    assert_eq!(json["payer"], common::PAYER);

    assert_eq!(facilitator.verify_calls(), 1);
    assert_eq!(facilitator.settle_calls(), 0);
    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn test_accepted_payment_settles_and_records_payer() {
    let registry = common::memory_registry();
    let facilitator = StubFacilitator::new(FacilitatorMode::Accept);
    let server = TestServer::new(common::app(common::create_paid_state(
        registry.clone(),
        facilitator.clone(),
    )))
    .unwrap();

    let response = server
        .post("/api/shorten")
        .add_header("x-payment", common::payment_header())
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_ok();

    let receipt = response
        .maybe_header("x-payment-response")
        .expect("settlement receipt header");
    let receipt = common::decode_header(receipt.to_str().unwrap());
    assert_eq!(receipt["success"], true);
    assert_eq!(receipt["transaction"], "0xabc123");

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["owner"], common::PAYER);
    assert_eq!(json["transaction"]["payer"], common::PAYER);
    assert_eq!(json["transaction"]["paymentVerified"], true);

    let code = json["shortCode"].as_str().unwrap();
    let record = registry.get(code).await.unwrap().unwrap();
    assert_eq!(record.creator, common::PAYER);

    assert_eq!(facilitator.settle_calls(), 1);
}

#[tokio::test]
async fn test_payer_header_cannot_override_verified_payer() {
    let facilitator = StubFacilitator::new(FacilitatorMode::Accept);
    let server = TestServer::new(common::app(common::create_paid_state(
        common::memory_registry(),
        facilitator,
    )))
    .unwrap();

    let response = server
        .post("/api/shorten")
        .add_header("x-payment", common::payment_header())
        .add_header("x-payer-address", "0x9999999999999999999999999999999999999999")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["owner"], common::PAYER);
}

#[tokio::test]
async fn test_failed_handler_is_not_settled() {
    let registry = common::memory_registry();
    registry
        .put("taken", "https://first.com", common::PAYER)
        .await
        .unwrap();
    let facilitator = StubFacilitator::new(FacilitatorMode::Accept);
    let server = TestServer::new(common::app(common::create_paid_state(
        registry,
        facilitator.clone(),
    )))
    .unwrap();

    let response = server
        .post("/api/shorten/custom")
        .add_header("x-payment", common::payment_header())
        .json(&json!({ "url": "https://example.com", "customCode": "taken" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert!(response.maybe_header("x-payment-response").is_none());
    assert_eq!(facilitator.verify_calls(), 1);
    assert_eq!(facilitator.settle_calls(), 0);
}

#[tokio::test]
async fn test_unreachable_facilitator() {
    let registry = common::memory_registry();
    let server = TestServer::new(common::app(common::create_paid_state(
        registry.clone(),
        StubFacilitator::new(FacilitatorMode::Unreachable),
    )))
    .unwrap();

    let response = server
        .post("/api/shorten")
        .add_header("x-payment", common::payment_header())
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "upstream_unavailable");
    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn test_declined_settlement_keeps_committed_url() {
    let registry = common::memory_registry();
    let facilitator = StubFacilitator::new(FacilitatorMode::DeclineSettlement);
    let server = TestServer::new(common::app(common::create_paid_state(
        registry.clone(),
        facilitator.clone(),
    )))
    .unwrap();

    let response = server
        .post("/api/shorten/custom")
        .add_header("x-payment", common::payment_header())
        .json(&json!({ "url": "https://example.com", "customCode": "promo" }))
        .await;

    response.assert_status(StatusCode::PAYMENT_REQUIRED);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"], "nonce_already_used");

    assert_eq!(facilitator.settle_calls(), 1);
    assert!(registry.exists("promo").await.unwrap());
}

#[tokio::test]
async fn test_custom_route_charges_custom_price() {
    let server = TestServer::new(common::app(common::create_paid_state(
        common::memory_registry(),
        StubFacilitator::new(FacilitatorMode::Accept),
    )))
    .unwrap();

    let response = server
        .post("/api/shorten/custom")
        .json(&json!({ "url": "https://example.com", "customCode": "promo" }))
        .await;

    response.assert_status(StatusCode::PAYMENT_REQUIRED);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["accepts"][0]["maxAmountRequired"], "2000");
    assert_eq!(
        json["accepts"][0]["resource"],
        "http://localhost:3000/api/shorten/custom"
    );
}

#[tokio::test]
async fn test_analytics_route_is_paid() {
    let registry = common::memory_registry();
    registry
        .put("abc123", "https://example.com", common::PAYER)
        .await
        .unwrap();
    let server = TestServer::new(common::app(common::create_paid_state(
        registry,
        StubFacilitator::new(FacilitatorMode::Accept),
    )))
    .unwrap();

    let unpaid = server.get("/api/analytics/abc123").await;
    unpaid.assert_status(StatusCode::PAYMENT_REQUIRED);
    assert_eq!(
        unpaid.json::<serde_json::Value>()["accepts"][0]["maxAmountRequired"],
        "100"
    );

    let paid = server
        .get("/api/analytics/abc123")
        .add_header("x-payment", common::payment_header())
        .await;
    paid.assert_status_ok();
    assert_eq!(paid.json::<serde_json::Value>()["payment"]["verified"], true);
}

#[tokio::test]
async fn test_info_and_redirect_stay_free() {
    let registry = common::memory_registry();
    registry
        .put("abc123", "https://example.com", common::PAYER)
        .await
        .unwrap();
    let facilitator = StubFacilitator::new(FacilitatorMode::Accept);
    let server = TestServer::new(common::app(common::create_paid_state(
        registry,
        facilitator.clone(),
    )))
    .unwrap();

    let info = server.get("/api/shorten").await;
    info.assert_status_ok();
    let json = info.json::<serde_json::Value>();
    assert_eq!(json["payment"]["required"], true);
    assert_eq!(json["payment"]["price"], "$0.001");
    assert_eq!(json["payment"]["network"], "base-sepolia");

    server.get("/api/shorten/custom").await.assert_status_ok();
    server.get("/api/redirect/abc123").await.assert_status_ok();
    server
        .get("/s/abc123")
        .await
        .assert_status(StatusCode::TEMPORARY_REDIRECT);

    assert_eq!(facilitator.verify_calls(), 0);
}
