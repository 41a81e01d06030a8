//! Handler for per-link analytics.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{SecondsFormat, Utc};

use crate::api::dto::analytics::{AnalyticsResponse, LinkAnalytics, PaymentInfo};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::extract_payer::Payer;

/// Returns the registry record behind a short code.
///
/// # Endpoint
///
/// `GET /api/analytics/{code}` (paid when the payment gate is enabled)
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "analytics": {
///     "shortCode": "aB3xY9",
///     "shortUrl": "http://localhost:3000/s/aB3xY9",
///     "originalUrl": "https://example.com",
///     "creator": "0x...",
///     "createdAt": "2025-01-15T10:30:00Z",
///     "daysSinceCreation": 3
///   },
///   "payment": {
///     "payer": "0x...",
///     "verified": true,
///     "service": "analytics",
///     "timestamp": "2025-01-18T12:00:00Z"
///   }
/// }
/// ```
///
/// Click counts are not tracked; the registry stores only creation data.
pub async fn analytics_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    payer: Payer,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let record = state.lookup.resolve(&code).await?;
    let now = Utc::now();

    Ok(Json(AnalyticsResponse {
        success: true,
        analytics: LinkAnalytics {
            short_url: state.short_url(&code),
            short_code: code,
            days_since_creation: record.days_since_creation(now),
            created_at: record.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            original_url: record.original_url,
            creator: record.creator,
        },
        payment: PaymentInfo {
            payer: payer.address,
            verified: payer.verified,
            service: "analytics".to_string(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        },
    }))
}
