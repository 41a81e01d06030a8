#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, routing::get};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use onchain_shortener::api::handlers::{health_handler, redirect_handler};
use onchain_shortener::api::middleware::payment::PaymentGates;
use onchain_shortener::api::routes::api_routes;
use onchain_shortener::application::services::AllocatorSettings;
use onchain_shortener::config::{BASE_SEPOLIA_USDC, PaymentConfig, ZERO_ADDRESS};
use onchain_shortener::domain::entities::UrlRecord;
use onchain_shortener::domain::repositories::{RegistryError, UrlRegistry};
use onchain_shortener::infrastructure::payment::{
    PaymentError, PaymentFacilitator, PaymentRequirements, SettleResponse, VerifyResponse,
};
use onchain_shortener::infrastructure::registry::InMemoryRegistry;
use onchain_shortener::state::AppState;

pub const BASE_URL: &str = "http://localhost:3000";
pub const PAYER: &str = "0x2222222222222222222222222222222222222222";
pub const PAY_TO: &str = "0x1111111111111111111111111111111111111111";

pub fn create_test_state(registry: Arc<dyn UrlRegistry>) -> AppState {
    AppState::new(registry, AllocatorSettings::default(), BASE_URL, ZERO_ADDRESS)
}

pub fn create_paid_state(
    registry: Arc<dyn UrlRegistry>,
    facilitator: Arc<StubFacilitator>,
) -> AppState {
    let gates = PaymentGates::from_config(facilitator, &payment_config(), BASE_URL).unwrap();
    create_test_state(registry).with_payments(gates)
}

/// Router with every route, without rate limiting.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/s/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_routes(state.payments.as_ref()))
        .with_state(state)
}

pub fn payment_config() -> PaymentConfig {
    PaymentConfig {
        pay_to: PAY_TO.to_string(),
        facilitator_url: "http://facilitator.test".to_string(),
        network: "base-sepolia".to_string(),
        asset: BASE_SEPOLIA_USDC.to_string(),
        asset_name: "USDC".to_string(),
        asset_version: "2".to_string(),
        price_standard: "$0.001".to_string(),
        price_custom: "$0.002".to_string(),
        price_analytics: "$0.0001".to_string(),
        max_timeout_seconds: 120,
    }
}

/// A well-formed `X-PAYMENT` header value signed by [`PAYER`].
pub fn payment_header() -> String {
    let payload = json!({
        "x402Version": 1,
        "scheme": "exact",
        "network": "base-sepolia",
        "payload": {
            "signature": "0xdeadbeef",
            "authorization": {
                "from": PAYER,
                "to": PAY_TO,
                "value": "1000",
                "validAfter": "0",
                "validBefore": "9999999999",
                "nonce": "0x01"
            }
        }
    });
    STANDARD.encode(serde_json::to_vec(&payload).unwrap())
}

pub fn decode_header(value: &str) -> Value {
    serde_json::from_slice(&STANDARD.decode(value).unwrap()).unwrap()
}

/// How the stub facilitator answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacilitatorMode {
    Accept,
    RejectPayment,
    DeclineSettlement,
    Unreachable,
}

/// Facilitator double that records calls.
pub struct StubFacilitator {
    mode: FacilitatorMode,
    verify_calls: AtomicUsize,
    settle_calls: AtomicUsize,
}

impl StubFacilitator {
    pub fn new(mode: FacilitatorMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            verify_calls: AtomicUsize::new(0),
            settle_calls: AtomicUsize::new(0),
        })
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn settle_calls(&self) -> usize {
        self.settle_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentFacilitator for StubFacilitator {
    async fn verify(
        &self,
        _payload: &Value,
        _requirements: &PaymentRequirements,
    ) -> Result<VerifyResponse, PaymentError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);

        match self.mode {
            FacilitatorMode::Unreachable => {
                Err(PaymentError::Transport("connection refused".to_string()))
            }
            FacilitatorMode::RejectPayment => Ok(VerifyResponse {
                is_valid: false,
                invalid_reason: Some("insufficient_funds".to_string()),
                payer: Some(PAYER.to_string()),
            }),
            _ => Ok(VerifyResponse {
                is_valid: true,
                invalid_reason: None,
                payer: Some(PAYER.to_string()),
            }),
        }
    }

    async fn settle(
        &self,
        _payload: &Value,
        requirements: &PaymentRequirements,
    ) -> Result<SettleResponse, PaymentError> {
        self.settle_calls.fetch_add(1, Ordering::SeqCst);

        let success = self.mode != FacilitatorMode::DeclineSettlement;
        Ok(SettleResponse {
            success,
            error_reason: (!success).then(|| "nonce_already_used".to_string()),
            transaction: if success {
                "0xabc123".to_string()
            } else {
                String::new()
            },
            network: requirements.network.clone(),
            payer: Some(PAYER.to_string()),
        })
    }
}

/// Registry in which every code is already taken.
pub struct FullRegistry;

#[async_trait]
impl UrlRegistry for FullRegistry {
    async fn exists(&self, _code: &str) -> Result<bool, RegistryError> {
        Ok(true)
    }

    async fn put(&self, code: &str, _url: &str, _owner: &str) -> Result<(), RegistryError> {
        Err(RegistryError::Duplicate(code.to_string()))
    }

    async fn get(&self, _code: &str) -> Result<Option<UrlRecord>, RegistryError> {
        Ok(None)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Registry whose probes report free codes but whose writes always lose a
/// race with another writer.
pub struct RacingRegistry;

#[async_trait]
impl UrlRegistry for RacingRegistry {
    async fn exists(&self, _code: &str) -> Result<bool, RegistryError> {
        Ok(false)
    }

    async fn put(&self, code: &str, _url: &str, _owner: &str) -> Result<(), RegistryError> {
        Err(RegistryError::Duplicate(code.to_string()))
    }

    async fn get(&self, _code: &str) -> Result<Option<UrlRecord>, RegistryError> {
        Ok(None)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Registry that cannot be reached.
pub struct DownRegistry;

#[async_trait]
impl UrlRegistry for DownRegistry {
    async fn exists(&self, _code: &str) -> Result<bool, RegistryError> {
        Err(RegistryError::Transport("connection refused".to_string()))
    }

    async fn put(&self, _code: &str, _url: &str, _owner: &str) -> Result<(), RegistryError> {
        Err(RegistryError::Transport("connection refused".to_string()))
    }

    async fn get(&self, _code: &str) -> Result<Option<UrlRecord>, RegistryError> {
        Err(RegistryError::Transport("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

pub fn memory_registry() -> Arc<InMemoryRegistry> {
    Arc::new(InMemoryRegistry::new())
}
