//! HTTP client for a remote x402 facilitator.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::service::{
    PaymentError, PaymentFacilitator, PaymentRequirements, SettleResponse, VerifyResponse,
    X402_VERSION,
};

/// Facilitator reached over HTTP(S), exposing `POST /verify` and `POST /settle`.
pub struct HttpFacilitator {
    client: Client,
    base_url: String,
}

impl HttpFacilitator {
    /// Creates a client for the facilitator at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PaymentError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &Value,
        requirements: &PaymentRequirements,
    ) -> Result<T, PaymentError> {
        let body = json!({
            "x402Version": X402_VERSION,
            "paymentPayload": payload,
            "paymentRequirements": requirements,
        });

        let url = self.endpoint(path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Facilitator {} returned {}", path, status);
            return Err(PaymentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PaymentError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PaymentFacilitator for HttpFacilitator {
    async fn verify(
        &self,
        payload: &Value,
        requirements: &PaymentRequirements,
    ) -> Result<VerifyResponse, PaymentError> {
        self.post("verify", payload, requirements).await
    }

    async fn settle(
        &self,
        payload: &Value,
        requirements: &PaymentRequirements,
    ) -> Result<SettleResponse, PaymentError> {
        self.post("settle", payload, requirements).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let facilitator =
            HttpFacilitator::new("https://x402.org/facilitator/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            facilitator.endpoint("verify"),
            "https://x402.org/facilitator/verify"
        );
    }
}
