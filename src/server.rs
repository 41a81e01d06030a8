//! HTTP server initialization and runtime setup.
//!
//! Handles registry and facilitator setup and the Axum server lifecycle.

use crate::api::middleware::payment::PaymentGates;
use crate::application::services::AllocatorSettings;
use crate::config::{Config, RegistryBackend};
use crate::domain::repositories::UrlRegistry;
use crate::infrastructure::payment::{HttpFacilitator, PaymentFacilitator};
use crate::infrastructure::registry::{EvmRegistry, InMemoryRegistry};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Timeout for a single facilitator request.
const FACILITATOR_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Registry backend (EVM contract or in-memory)
/// - Payment facilitator client and per-route gates (if enabled)
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - The registry cannot be reached or configured
/// - Payment prices are invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let registry = build_registry(&config).await?;

    if !registry.health_check().await {
        tracing::warn!("Registry health check failed at startup; continuing");
    }

    let settings = AllocatorSettings {
        code_length: config.code_length,
        max_attempts: config.max_allocation_attempts,
    };

    let mut state = AppState::new(registry, settings, &config.app_url, &config.default_owner);

    if let Some(ref payment) = config.payment {
        let facilitator: Arc<dyn PaymentFacilitator> = Arc::new(
            HttpFacilitator::new(&payment.facilitator_url, FACILITATOR_TIMEOUT)
                .context("Failed to create facilitator client")?,
        );
        let gates = PaymentGates::from_config(facilitator, payment, &config.app_url)
            .context("Invalid payment configuration")?;

        tracing::info!(
            "Payment gate enabled: {} / {} / {} on {}",
            gates.standard.price(),
            gates.custom.price(),
            gates.analytics.price(),
            payment.network
        );
        state = state.with_payments(gates);
    } else {
        tracing::info!("Payment gate disabled");
    }

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Builds the configured registry backend.
///
/// # Errors
///
/// Returns an error if the EVM backend is selected without a contract
/// address or cannot connect.
pub async fn build_registry(config: &Config) -> Result<Arc<dyn UrlRegistry>> {
    match config.registry_backend {
        RegistryBackend::Evm => {
            let contract = config
                .contract_address
                .as_deref()
                .context("CONTRACT_ADDRESS must be set when REGISTRY_BACKEND=evm")?;

            let registry = EvmRegistry::connect(
                &config.rpc_url,
                contract,
                config.server_private_key.as_deref(),
                config.registry_timeout(),
            )
            .await?;

            tracing::info!("Registry: contract {:?}", registry.contract_address());
            Ok(Arc::new(registry))
        }
        RegistryBackend::Memory => {
            tracing::warn!("Registry: in-memory (mappings are lost on restart)");
            Ok(Arc::new(InMemoryRegistry::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
