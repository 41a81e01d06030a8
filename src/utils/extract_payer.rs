//! Owner resolution for new short URLs.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::api::middleware::payment::VerifiedPayer;
use crate::state::AppState;

/// Header naming the payer when the payment gate is disabled.
pub const PAYER_HEADER: &str = "x-payer-address";

/// Who a request is made on behalf of.
///
/// Resolved in order:
/// 1. payer confirmed by the payment gate
/// 2. `X-Payer-Address` header
/// 3. the configured default owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payer {
    pub address: String,
    /// True only when the address came from a verified payment.
    pub verified: bool,
}

impl FromRequestParts<AppState> for Payer {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(VerifiedPayer(address)) = parts.extensions.get::<VerifiedPayer>() {
            return Ok(Payer {
                address: address.clone(),
                verified: true,
            });
        }

        let address = parts
            .headers
            .get(PAYER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(state.default_owner.as_str())
            .to_string();

        Ok(Payer {
            address,
            verified: false,
        })
    }
}
