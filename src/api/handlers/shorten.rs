//! Handlers for the shortening endpoints.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::service_info::{CustomCodeRules, PaymentTerms, ServiceInfoResponse};
use crate::api::dto::shorten::{CustomShortenRequest, ShortenRequest, ShortenResponse};
use crate::api::middleware::payment::PaymentGate;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::{CUSTOM_CODE_MAX_LENGTH, CUSTOM_CODE_MIN_LENGTH};
use crate::utils::extract_payer::Payer;

/// Shortens a URL under a randomly generated code.
///
/// # Endpoint
///
/// `POST /api/shorten` (paid when the payment gate is enabled)
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "shortUrl": "http://localhost:3000/s/aB3xY9",
///   "shortCode": "aB3xY9",
///   "originalUrl": "https://example.com/some/long/path",
///   "owner": "0x...",
///   "custom": false,
///   "message": "URL shortened successfully and stored on-chain",
///   "transaction": { "payer": "0x...", "paymentVerified": true }
/// }
/// ```
///
/// # Errors
///
/// - 400 if the URL is invalid
/// - 503 if no free code was found within the attempt budget
/// - 502 if the registry failed or rejected the write
pub async fn shorten_handler(
    State(state): State<AppState>,
    payer: Payer,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let allocation = state
        .allocator
        .allocate(&payload.url, None, &payer.address)
        .await?;

    let short_url = state.short_url(&allocation.code);

    Ok(Json(ShortenResponse::new(allocation, short_url, payer)))
}

/// Shortens a URL under a caller-chosen code.
///
/// # Endpoint
///
/// `POST /api/shorten/custom` (paid, at a higher price than generated codes)
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com", "customCode": "promo2025" }
/// ```
///
/// # Response
///
/// Same shape as [`shorten_handler`], with `"custom": true`.
///
/// # Errors
///
/// - 400 if the URL or custom code is invalid
/// - 409 if the custom code is already taken
/// - 502 if the registry failed or rejected the write
pub async fn custom_shorten_handler(
    State(state): State<AppState>,
    payer: Payer,
    Json(payload): Json<CustomShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let allocation = state
        .allocator
        .allocate(
            &payload.url,
            Some(payload.custom_code.as_deref().unwrap_or_default()),
            &payer.address,
        )
        .await?;

    let short_url = state.short_url(&allocation.code);

    Ok(Json(ShortenResponse::new(allocation, short_url, payer)))
}

/// Describes the generated-code endpoint and its price.
///
/// # Endpoint
///
/// `GET /api/shorten`
pub async fn shorten_info_handler(State(state): State<AppState>) -> Json<ServiceInfoResponse> {
    let gate = state.payments.as_ref().map(|g| &g.standard);

    Json(ServiceInfoResponse {
        service: "URL Shortener".to_string(),
        status: "operational".to_string(),
        payment: payment_terms(gate),
        rules: None,
    })
}

/// Describes the custom-code endpoint, its price and the code rules.
///
/// # Endpoint
///
/// `GET /api/shorten/custom`
pub async fn custom_info_handler(State(state): State<AppState>) -> Json<ServiceInfoResponse> {
    let gate = state.payments.as_ref().map(|g| &g.custom);

    Json(ServiceInfoResponse {
        service: "Custom URL Shortener".to_string(),
        status: "operational".to_string(),
        payment: payment_terms(gate),
        rules: Some(CustomCodeRules {
            min_length: CUSTOM_CODE_MIN_LENGTH,
            max_length: CUSTOM_CODE_MAX_LENGTH,
            allowed_characters: "alphanumeric only (a-z, A-Z, 0-9)".to_string(),
            case_sensitive: true,
        }),
    })
}

fn payment_terms(gate: Option<&PaymentGate>) -> PaymentTerms {
    PaymentTerms {
        required: gate.is_some(),
        price: gate.map(|g| g.price().to_string()),
        network: gate.map(|g| g.network().to_string()),
        protocol: "x402".to_string(),
    }
}
