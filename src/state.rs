//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::api::middleware::payment::PaymentGates;
use crate::application::services::{AllocatorSettings, CodeAllocator, LookupService};
use crate::domain::repositories::UrlRegistry;

/// Application state shared across all handlers.
///
/// Cheap to clone; every service sits behind an [`Arc`].
#[derive(Clone)]
pub struct AppState {
    pub allocator: Arc<CodeAllocator<dyn UrlRegistry>>,
    pub lookup: Arc<LookupService<dyn UrlRegistry>>,
    pub registry: Arc<dyn UrlRegistry>,
    /// `None` when the payment gate is disabled.
    pub payments: Option<PaymentGates>,
    /// Public base URL without trailing slash.
    pub base_url: String,
    /// Owner recorded when no payer is known.
    pub default_owner: String,
}

impl AppState {
    pub fn new(
        registry: Arc<dyn UrlRegistry>,
        settings: AllocatorSettings,
        base_url: &str,
        default_owner: &str,
    ) -> Self {
        Self {
            allocator: Arc::new(CodeAllocator::new(registry.clone(), settings)),
            lookup: Arc::new(LookupService::new(registry.clone())),
            registry,
            payments: None,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_owner: default_owner.to_string(),
        }
    }

    pub fn with_payments(mut self, gates: PaymentGates) -> Self {
        self.payments = Some(gates);
        self
    }

    /// Public URL that redirects to the target of `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/s/{}", self.base_url, code)
    }

    pub fn is_payment_enabled(&self) -> bool {
        self.payments.is_some()
    }
}
