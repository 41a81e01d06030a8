//! API route configuration.
//!
//! Paid routes are wrapped in [`crate::api::middleware::payment`] when the
//! payment gate is enabled; the informational `GET` routes are always free.

use axum::{
    Router, middleware,
    routing::{MethodRouter, get, post},
};

use crate::api::handlers::{
    analytics_handler, custom_info_handler, custom_shorten_handler, resolve_handler,
    shorten_handler, shorten_info_handler,
};
use crate::api::middleware::payment::{self, PaymentGate, PaymentGates};
use crate::state::AppState;

/// All API routes.
///
/// # Endpoints
///
/// - `POST /shorten`          - Shorten with a generated code (paid)
/// - `GET  /shorten`          - Pricing for generated codes
/// - `POST /shorten/custom`   - Shorten with a custom code (paid)
/// - `GET  /shorten/custom`   - Pricing and custom code rules
/// - `GET  /redirect/{code}`  - Resolve a code to its URL as JSON
/// - `GET  /analytics/{code}` - Registry record of a code (paid)
pub fn api_routes(payments: Option<&PaymentGates>) -> Router<AppState> {
    Router::new()
        .route(
            "/shorten",
            get(shorten_info_handler).merge(paid(
                post(shorten_handler),
                payments.map(|g| &g.standard),
            )),
        )
        .route(
            "/shorten/custom",
            get(custom_info_handler).merge(paid(
                post(custom_shorten_handler),
                payments.map(|g| &g.custom),
            )),
        )
        .route("/redirect/{code}", get(resolve_handler))
        .route(
            "/analytics/{code}",
            paid(get(analytics_handler), payments.map(|g| &g.analytics)),
        )
}

fn paid(route: MethodRouter<AppState>, gate: Option<&PaymentGate>) -> MethodRouter<AppState> {
    match gate {
        Some(gate) => route.route_layer(middleware::from_fn_with_state(
            gate.clone(),
            payment::layer,
        )),
        None => route,
    }
}
