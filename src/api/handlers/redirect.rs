//! Handlers for short code resolution.

use axum::{
    Json,
    extract::{Path, State},
    response::Redirect,
};
use tracing::debug;

use crate::api::dto::redirect::ResolveResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves a short code to its original URL without redirecting.
///
/// # Endpoint
///
/// `GET /api/redirect/{code}`
///
/// # Response
///
/// ```json
/// { "success": true, "originalUrl": "https://example.com", "shortCode": "aB3xY9" }
/// ```
///
/// # Errors
///
/// - 404 if the code is not registered
/// - 502 if the registry is unreachable
pub async fn resolve_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ResolveResponse>, AppError> {
    let record = state.lookup.resolve(&code).await?;

    Ok(Json(ResolveResponse {
        success: true,
        original_url: record.original_url,
        short_code: code,
    }))
}

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /s/{code}`
///
/// Returns `307 Temporary Redirect`. Records are immutable, but a temporary
/// redirect keeps browsers coming back through the service.
///
/// # Errors
///
/// - 404 if the code is not registered
/// - 502 if the registry is unreachable
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let record = state.lookup.resolve(&code).await?;
    debug!("Redirecting '{}' to {}", code, record.original_url);

    Ok(Redirect::temporary(&record.original_url))
}
