//! Encoding helpers for payment headers and prices.
//!
//! Payment proofs travel in the `X-PAYMENT` request header and settlement
//! receipts in the `X-PAYMENT-RESPONSE` response header, both as base64
//! encoded JSON.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::Value;

/// Errors produced while decoding a payment header or a price.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("payment header is not valid base64")]
    InvalidBase64,

    #[error("payment header is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("payment header must encode a JSON object")]
    NotAnObject,

    #[error("invalid price '{0}'")]
    InvalidPrice(String),
}

/// Decodes an `X-PAYMENT` header value into its JSON payload.
pub fn decode_payment_header(raw: &str) -> Result<Value, CodecError> {
    let bytes = STANDARD
        .decode(raw.trim())
        .map_err(|_| CodecError::InvalidBase64)?;

    let value: Value =
        serde_json::from_slice(&bytes).map_err(|e| CodecError::InvalidJson(e.to_string()))?;

    if !value.is_object() {
        return Err(CodecError::NotAnObject);
    }

    Ok(value)
}

/// Encodes a value as base64 JSON for the `X-PAYMENT-RESPONSE` header.
pub fn encode_payment_response<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(value)?;
    Ok(STANDARD.encode(json))
}

/// Converts a USD price such as `"$0.001"` into atomic token units.
///
/// `decimals` is the token's decimal count (6 for USDC). Prices with more
/// fractional digits than the token supports are rejected instead of
/// rounded.
///
/// ```ignore
/// assert_eq!(parse_usd_price("$0.001", 6).unwrap(), 1_000);
/// assert_eq!(parse_usd_price("2", 6).unwrap(), 2_000_000);
/// ```
pub fn parse_usd_price(input: &str, decimals: u32) -> Result<u64, CodecError> {
    let invalid = || CodecError::InvalidPrice(input.to_string());

    let trimmed = input.trim();
    let amount = trimmed.strip_prefix('$').unwrap_or(trimmed);
    if amount.is_empty() {
        return Err(invalid());
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }
    if fraction.len() > decimals as usize {
        return Err(invalid());
    }

    let scale = 10u64.checked_pow(decimals).ok_or_else(invalid)?;
    let whole_units = if whole.is_empty() {
        0
    } else {
        whole.parse::<u64>().map_err(|_| invalid())?
    };

    let padded = format!("{fraction:0<width$}", width = decimals as usize);
    let fraction_units = if padded.is_empty() {
        0
    } else {
        padded.parse::<u64>().map_err(|_| invalid())?
    };

    let units = whole_units
        .checked_mul(scale)
        .and_then(|w| w.checked_add(fraction_units))
        .ok_or_else(invalid)?;

    if units == 0 {
        return Err(invalid());
    }

    Ok(units)
}
