//! Resolution of short codes to their registry records.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::warn;

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::{RegistryError, UrlRegistry};
use crate::error::AppError;
use crate::utils::code_generator::is_well_formed;

/// Extra attempts made for a read that failed transiently.
const READ_RETRIES: usize = 3;

/// Unit of the read backoff; retry `n` waits `unit * 2^n` before jitter.
const READ_RETRY_UNIT_MS: u64 = 25;

/// Upper bound on a single backoff delay.
const READ_RETRY_MAX_DELAY: Duration = Duration::from_millis(500);

/// Read-side service for redirects and analytics.
///
/// Lookups are idempotent, so transient registry failures (timeouts,
/// transport errors) are retried with jittered exponential backoff.
/// Writes never go through here.
pub struct LookupService<R: UrlRegistry + ?Sized> {
    registry: Arc<R>,
    retry_unit: Duration,
}

impl<R: UrlRegistry + ?Sized> LookupService<R> {
    pub fn new(registry: Arc<R>) -> Self {
        Self {
            registry,
            retry_unit: Duration::from_millis(READ_RETRY_UNIT_MS),
        }
    }

    /// Overrides the backoff unit.
    pub fn with_retry_unit(mut self, unit: Duration) -> Self {
        self.retry_unit = unit;
        self
    }

    /// Returns the record stored under `code`.
    ///
    /// Codes that could never have been allocated are answered with
    /// not-found without contacting the registry.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code is malformed or unregistered
    /// - [`AppError::Unavailable`] if the registry kept failing
    pub async fn resolve(&self, code: &str) -> Result<UrlRecord, AppError> {
        if !is_well_formed(code) {
            return Err(not_found(code));
        }

        let strategy = read_backoff(self.retry_unit).map(jitter);

        let record = RetryIf::start(
            strategy,
            || self.registry.get(code),
            |e: &RegistryError| {
                let retry = e.is_transient();
                if retry {
                    warn!("Registry read for '{}' failed, retrying: {}", code, e);
                }
                retry
            },
        )
        .await
        .map_err(|e| {
            AppError::unavailable(
                "Registry is unavailable",
                json!({ "reason": e.to_string(), "kind": e.kind() }),
            )
        })?;

        record.ok_or_else(|| not_found(code))
    }
}

/// Delays between read retries before jitter: 2, 4, 8 units, capped.
fn read_backoff(unit: Duration) -> impl Iterator<Item = Duration> {
    let unit_ms = u64::try_from(unit.as_millis()).unwrap_or(u64::MAX).max(1);

    ExponentialBackoff::from_millis(2)
        .factor(unit_ms)
        .max_delay(READ_RETRY_MAX_DELAY)
        .take(READ_RETRIES)
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short URL does not exist", json!({ "code": code }))
}
