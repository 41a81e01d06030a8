//! DTOs describing the paid endpoints to clients.

use serde::Serialize;

/// Answer of `GET /api/shorten` and `GET /api/shorten/custom`.
#[derive(Debug, Serialize)]
pub struct ServiceInfoResponse {
    pub service: String,
    pub status: String,
    pub payment: PaymentTerms,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<CustomCodeRules>,
}

#[derive(Debug, Serialize)]
pub struct PaymentTerms {
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    pub protocol: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCodeRules {
    pub min_length: usize,
    pub max_length: usize,
    pub allowed_characters: String,
    pub case_sensitive: bool,
}
