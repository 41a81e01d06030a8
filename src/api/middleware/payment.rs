//! Payment gate for paid endpoints.
//!
//! Each paid route carries a [`PaymentGate`] with its own price. The gate
//! delegates verification and settlement to a [`PaymentFacilitator`]; it
//! never checks payment signatures itself.

use std::sync::Arc;

use axum::{
    Json,
    extract::{OriginalUri, Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::config::{PAYMENT_ASSET_DECIMALS, PaymentConfig};
use crate::error::AppError;
use crate::infrastructure::payment::{
    PaymentFacilitator, PaymentRequirements, SettleResponse, X402_VERSION,
};
use crate::utils::payment_codec::{
    CodecError, decode_payment_header, encode_payment_response, parse_usd_price,
};

/// Request header carrying the base64 payment payload.
pub const PAYMENT_HEADER: HeaderName = HeaderName::from_static("x-payment");

/// Response header carrying the base64 settlement receipt.
pub const PAYMENT_RESPONSE_HEADER: HeaderName = HeaderName::from_static("x-payment-response");

/// Payer address confirmed by the facilitator, attached to the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedPayer(pub String);

/// Price and payment terms for one paid route.
#[derive(Clone)]
pub struct PaymentGate {
    facilitator: Arc<dyn PaymentFacilitator>,
    template: PaymentRequirements,
    price: String,
    resource_base: String,
}

impl PaymentGate {
    /// Builds a gate charging `price` (e.g. `"$0.001"`).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidPrice`] if the price cannot be expressed
    /// in the asset's smallest unit.
    pub fn new(
        facilitator: Arc<dyn PaymentFacilitator>,
        config: &PaymentConfig,
        app_url: &str,
        price: &str,
        description: &str,
    ) -> Result<Self, CodecError> {
        let amount = parse_usd_price(price, PAYMENT_ASSET_DECIMALS)?;

        let template = PaymentRequirements {
            scheme: "exact".to_string(),
            network: config.network.clone(),
            max_amount_required: amount.to_string(),
            resource: String::new(),
            description: description.to_string(),
            mime_type: "application/json".to_string(),
            pay_to: config.pay_to.clone(),
            max_timeout_seconds: config.max_timeout_seconds,
            asset: config.asset.clone(),
            extra: Some(json!({
                "name": config.asset_name,
                "version": config.asset_version,
            })),
        };

        Ok(Self {
            facilitator,
            template,
            price: price.to_string(),
            resource_base: app_url.trim_end_matches('/').to_string(),
        })
    }

    /// Human-readable price, as configured.
    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn network(&self) -> &str {
        &self.template.network
    }

    /// Requirements for a request to `path`.
    pub fn requirements_for(&self, path: &str) -> PaymentRequirements {
        PaymentRequirements {
            resource: format!("{}{}", self.resource_base, path),
            ..self.template.clone()
        }
    }
}

/// Gates for every paid route.
#[derive(Clone)]
pub struct PaymentGates {
    pub standard: PaymentGate,
    pub custom: PaymentGate,
    pub analytics: PaymentGate,
}

impl PaymentGates {
    /// Builds all gates from configuration, sharing one facilitator client.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidPrice`] if any configured price is invalid.
    pub fn from_config(
        facilitator: Arc<dyn PaymentFacilitator>,
        config: &PaymentConfig,
        app_url: &str,
    ) -> Result<Self, CodecError> {
        Ok(Self {
            standard: PaymentGate::new(
                facilitator.clone(),
                config,
                app_url,
                &config.price_standard,
                "Create a shortened URL",
            )?,
            custom: PaymentGate::new(
                facilitator.clone(),
                config,
                app_url,
                &config.price_custom,
                "Create a shortened URL with a custom code",
            )?,
            analytics: PaymentGate::new(
                facilitator,
                config,
                app_url,
                &config.price_analytics,
                "View analytics for a shortened URL",
            )?,
        })
    }
}

/// Requires a valid payment before the request reaches the handler.
///
/// # Flow
///
/// 1. Read and decode the `X-PAYMENT` header
/// 2. Ask the facilitator to verify it against this route's requirements
/// 3. Attach [`VerifiedPayer`] and run the handler
/// 4. If the handler succeeded, settle and return the receipt in
///    `X-PAYMENT-RESPONSE`
///
/// Failed handlers are never settled, so the client is not charged for
/// rejected requests. A settlement failure after a successful handler does
/// not undo the handler's work.
///
/// # Responses
///
/// - **402 Payment Required**: header missing, malformed, rejected by the
///   facilitator, or settlement declined. Body:
///   `{"x402Version": 1, "error": "...", "accepts": [requirements]}`
/// - **502 Bad Gateway**: facilitator unreachable
///
/// # Example
///
/// ```rust,ignore
/// let route = post(shorten_handler)
///     .route_layer(middleware::from_fn_with_state(gates.standard.clone(), payment::layer));
/// ```
pub async fn layer(
    State(gate): State<PaymentGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let requirements = gate.requirements_for(&path);

    let Some(raw) = req.headers().get(PAYMENT_HEADER) else {
        return Ok(payment_required(
            &requirements,
            "X-PAYMENT header is required",
            None,
        ));
    };

    let payload = match raw
        .to_str()
        .map_err(|_| CodecError::InvalidBase64)
        .and_then(decode_payment_header)
    {
        Ok(payload) => payload,
        Err(e) => return Ok(payment_required(&requirements, &e.to_string(), None)),
    };

    let verification = gate
        .facilitator
        .verify(&payload, &requirements)
        .await
        .map_err(|e| {
            error!("Payment verification request failed: {}", e);
            AppError::unavailable(
                "Payment facilitator is unavailable",
                json!({ "reason": e.to_string() }),
            )
        })?;

    if !verification.is_valid {
        let reason = verification
            .invalid_reason
            .as_deref()
            .unwrap_or("Payment verification failed");
        warn!("Payment rejected for {}: {}", requirements.resource, reason);
        return Ok(payment_required(
            &requirements,
            reason,
            verification.payer.as_deref(),
        ));
    }

    let payer = verification.payer.or_else(|| payer_from_payload(&payload));
    if let Some(ref payer) = payer {
        req.extensions_mut().insert(VerifiedPayer(payer.clone()));
    }

    let mut response = next.run(req).await;

    if !response.status().is_success() {
        return Ok(response);
    }

    let settlement = match gate.facilitator.settle(&payload, &requirements).await {
        Ok(settlement) => settlement,
        Err(e) => {
            error!(
                "Payment settlement request failed for {} after the request completed: {}",
                requirements.resource, e
            );
            return Err(AppError::unavailable(
                "Payment facilitator is unavailable",
                json!({ "reason": e.to_string(), "stage": "settle" }),
            ));
        }
    };

    if !settlement.success {
        let reason = settlement
            .error_reason
            .as_deref()
            .unwrap_or("Payment settlement failed");
        error!(
            "Settlement declined for {} after the request completed: {}",
            requirements.resource, reason
        );
        return Ok(payment_required(&requirements, reason, payer.as_deref()));
    }

    info!(
        "Payment settled for {} (tx {})",
        requirements.resource, settlement.transaction
    );
    attach_receipt(&mut response, &settlement);

    Ok(response)
}

fn attach_receipt(response: &mut Response, settlement: &SettleResponse) {
    match encode_payment_response(settlement)
        .ok()
        .and_then(|encoded| HeaderValue::from_str(&encoded).ok())
    {
        Some(value) => {
            response.headers_mut().insert(PAYMENT_RESPONSE_HEADER, value);
        }
        None => warn!("Could not encode settlement receipt"),
    }
}

/// Reads `payload.authorization.from` from an exact-scheme EVM payment.
fn payer_from_payload(payload: &Value) -> Option<String> {
    payload
        .pointer("/payload/authorization/from")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn payment_required(
    requirements: &PaymentRequirements,
    error: &str,
    payer: Option<&str>,
) -> Response {
    let mut body = json!({
        "x402Version": X402_VERSION,
        "error": error,
        "accepts": [requirements],
    });

    if let Some(payer) = payer {
        body["payer"] = json!(payer);
    }

    (StatusCode::PAYMENT_REQUIRED, Json(body)).into_response()
}
