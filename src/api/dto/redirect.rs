//! DTOs for code resolution.

use serde::Serialize;

/// JSON answer of `GET /api/redirect/{code}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub success: bool,
    pub original_url: String,
    pub short_code: String,
}
