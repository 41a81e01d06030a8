//! DTOs for the analytics endpoint.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub success: bool,
    pub analytics: LinkAnalytics,
    pub payment: PaymentInfo,
}

/// Registry facts about one short URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAnalytics {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub creator: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
    pub days_since_creation: i64,
}

#[derive(Debug, Serialize)]
pub struct PaymentInfo {
    pub payer: String,
    pub verified: bool,
    pub service: String,
    /// RFC 3339 timestamp of this request.
    pub timestamp: String,
}
