//! Payment facilitator trait and wire types.
//!
//! Payments follow the x402 flow: the client attaches a signed payment
//! payload in `X-PAYMENT`, the service asks a facilitator to verify it,
//! runs the request, then asks the facilitator to settle it on-chain. This
//! service never inspects signatures itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version sent to facilitators and advertised to clients.
pub const X402_VERSION: u32 = 1;

/// What a client must pay for a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirements {
    pub scheme: String,
    pub network: String,
    /// Amount in the asset's smallest unit, as a decimal string.
    pub max_amount_required: String,
    pub resource: String,
    pub description: String,
    pub mime_type: String,
    pub pay_to: String,
    pub max_timeout_seconds: u64,
    pub asset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

/// Facilitator answer to a verification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
}

/// Facilitator answer to a settlement request.
///
/// Also the payload returned to clients in `X-PAYMENT-RESPONSE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,
    #[serde(default)]
    pub transaction: String,
    #[serde(default)]
    pub network: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
}

/// Errors talking to a facilitator.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("facilitator request failed: {0}")]
    Transport(String),

    #[error("facilitator returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected facilitator response: {0}")]
    Decode(String),
}

/// Remote service that verifies and settles payments.
///
/// # Implementations
///
/// - [`crate::infrastructure::payment::HttpFacilitator`] - x402 facilitator over HTTPS
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentFacilitator: Send + Sync {
    /// Checks that `payload` satisfies `requirements` without moving funds.
    async fn verify(
        &self,
        payload: &Value,
        requirements: &PaymentRequirements,
    ) -> Result<VerifyResponse, PaymentError>;

    /// Executes a previously verified payment.
    async fn settle(
        &self,
        payload: &Value,
        requirements: &PaymentRequirements,
    ) -> Result<SettleResponse, PaymentError>;
}
