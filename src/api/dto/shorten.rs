//! DTOs for the shortening endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Allocation;
use crate::utils::code_generator::CUSTOM_CODE_REGEX;
use crate::utils::extract_payer::Payer;

/// Request to shorten a URL with a generated code.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten (must be valid HTTP/HTTPS).
    #[validate(length(max = 2048, message = "URL is too long"))]
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

/// Request to shorten a URL under a caller-chosen code.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomShortenRequest {
    #[validate(length(max = 2048, message = "URL is too long"))]
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    /// 3-20 ASCII letters or digits, case-sensitive.
    #[validate(required(message = "Custom code is required"))]
    #[validate(regex(
        path = "*CUSTOM_CODE_REGEX",
        message = "Custom code must be 3-20 alphanumeric characters"
    ))]
    pub custom_code: Option<String>,
}

/// Result of a successful shortening.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub success: bool,
    pub short_url: String,
    pub short_code: String,
    pub original_url: String,
    pub owner: String,
    pub custom: bool,
    pub message: String,
    pub transaction: TransactionInfo,
}

/// Who paid for the allocation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    pub payer: String,
    pub payment_verified: bool,
}

impl ShortenResponse {
    pub fn new(allocation: Allocation, short_url: String, payer: Payer) -> Self {
        let custom = allocation.is_custom();
        let message = if custom {
            "Custom URL shortened successfully and stored on-chain"
        } else {
            "URL shortened successfully and stored on-chain"
        };

        Self {
            success: true,
            short_url,
            short_code: allocation.code,
            original_url: allocation.original_url,
            owner: allocation.owner,
            custom,
            message: message.to_string(),
            transaction: TransactionInfo {
                payer: payer.address,
                payment_verified: payer.verified,
            },
        }
    }
}
