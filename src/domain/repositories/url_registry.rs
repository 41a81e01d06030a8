//! Registry trait for the authoritative code → URL store.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::entities::UrlRecord;

/// Failures reported by a registry backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    #[error("registry call timed out after {0:?}")]
    Timeout(Duration),

    #[error("short code '{0}' is already registered")]
    Duplicate(String),

    #[error("not authorized to write to the registry: {0}")]
    Unauthorized(String),

    #[error("invalid owner identifier '{0}'")]
    InvalidOwner(String),

    #[error("registry transport error: {0}")]
    Transport(String),

    #[error("registry rejected the call: {0}")]
    Rejected(String),
}

impl RegistryError {
    /// Short label used in logs, metrics and error details.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::Timeout(_) => "timeout",
            RegistryError::Duplicate(_) => "duplicate",
            RegistryError::Unauthorized(_) => "unauthorized",
            RegistryError::InvalidOwner(_) => "invalid_owner",
            RegistryError::Transport(_) => "transport",
            RegistryError::Rejected(_) => "rejected",
        }
    }

    /// True for failures worth retrying on idempotent reads.
    pub fn is_transient(&self) -> bool {
        matches!(self, RegistryError::Timeout(_) | RegistryError::Transport(_))
    }
}

/// The authoritative store of short code mappings.
///
/// The store is external and shared with other writers, so an `exists`
/// answer can be stale by the time `put` runs. Implementations must make
/// `put` itself reject codes that are already registered with
/// [`RegistryError::Duplicate`]; the allocator treats `put` as the single
/// source of truth and `exists` only as an early hint.
///
/// # Implementations
///
/// - [`crate::infrastructure::registry::EvmRegistry`] - URL storage contract on an EVM chain
/// - [`crate::infrastructure::registry::InMemoryRegistry`] - process-local store for development and tests
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRegistry: Send + Sync {
    /// Returns whether `code` is already registered.
    ///
    /// Read-only; safe to call repeatedly and concurrently.
    async fn exists(&self, code: &str) -> Result<bool, RegistryError>;

    /// Commits a new mapping.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Duplicate`] if `code` is already registered
    /// - [`RegistryError::InvalidOwner`] if the backend cannot represent `owner`
    /// - [`RegistryError::Unauthorized`] if this service may not write
    /// - [`RegistryError::Timeout`] / [`RegistryError::Transport`] on I/O failure
    async fn put(&self, code: &str, url: &str, owner: &str) -> Result<(), RegistryError>;

    /// Looks up the record for `code`.
    ///
    /// Returns `Ok(None)` if the code is not registered.
    async fn get(&self, code: &str) -> Result<Option<UrlRecord>, RegistryError>;

    /// Checks whether the backend is reachable.
    async fn health_check(&self) -> bool;
}
