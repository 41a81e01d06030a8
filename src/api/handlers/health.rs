//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Registry reachable
/// - **503 Service Unavailable**: Registry unreachable
///
/// # Components Checked
///
/// 1. **Registry**: Backend reachability (latest block for the EVM backend)
/// 2. **Payments**: Whether the payment gate is enabled (informational)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "registry": { "status": "ok", "message": "Registry reachable" },
///     "payments": { "status": "ok", "message": "Enabled (base-sepolia)" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let registry_check = check_registry(&state).await;
    let payments_check = check_payments(&state);

    let healthy = registry_check.is_ok();

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            registry: registry_check,
            payments: payments_check,
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_registry(state: &AppState) -> CheckStatus {
    if state.registry.health_check().await {
        CheckStatus::ok("Registry reachable")
    } else {
        CheckStatus::error("Registry unreachable")
    }
}

fn check_payments(state: &AppState) -> CheckStatus {
    match state.payments {
        Some(ref gates) => CheckStatus::ok(format!("Enabled ({})", gates.standard.network())),
        None => CheckStatus::disabled("Payment gate disabled"),
    }
}
