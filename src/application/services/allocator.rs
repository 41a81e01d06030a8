//! Short code allocation against the external registry.

use std::sync::Arc;

use metrics::counter;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{Allocation, ShortCode};
use crate::domain::repositories::{RegistryError, UrlRegistry};
use crate::error::AppError;
use crate::utils::code_generator::DEFAULT_CODE_LENGTH;
use crate::utils::url_validator::validate_target_url;

/// Default number of generated candidates probed before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Tunables for [`CodeAllocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorSettings {
    /// Length of generated codes.
    pub code_length: usize,
    /// Generated candidates probed per request.
    pub max_attempts: usize,
}

impl Default for AllocatorSettings {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Produces unique short codes and commits them to the registry.
///
/// # Uniqueness
///
/// The `exists` probe and the `put` commit are separate registry calls, so
/// two concurrent requests can both see a free candidate. `put` is the only
/// authority: a backend rejects duplicates there and the allocator reports
/// that as a commit failure. The probe only keeps the common collision path
/// cheap and gives custom-code callers a clean conflict response.
///
/// Nothing is cached locally; every request goes to the registry.
pub struct CodeAllocator<R: UrlRegistry + ?Sized> {
    registry: Arc<R>,
    settings: AllocatorSettings,
}

impl<R: UrlRegistry + ?Sized> CodeAllocator<R> {
    pub fn new(registry: Arc<R>, settings: AllocatorSettings) -> Self {
        Self { registry, settings }
    }

    pub fn settings(&self) -> AllocatorSettings {
        self.settings
    }

    /// Allocates a code for `original_url` and commits it under `owner`.
    ///
    /// With `desired_code` the allocator runs in custom mode: the code is
    /// validated, probed once and committed, with no retry. Without it a
    /// random candidate is drawn until one is free or the attempt budget
    /// runs out.
    ///
    /// All input validation happens before the first registry call.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a malformed URL, custom code or blank owner
    /// - [`AppError::Conflict`] if the custom code is already registered
    /// - [`AppError::Exhausted`] if every generated candidate collided
    /// - [`AppError::Unavailable`] if an `exists` probe failed
    /// - [`AppError::Commit`] if the registry rejected or failed the write
    pub async fn allocate(
        &self,
        original_url: &str,
        desired_code: Option<&str>,
        owner: &str,
    ) -> Result<Allocation, AppError> {
        validate_target_url(original_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let custom = desired_code.map(ShortCode::custom).transpose()?;

        if owner.trim().is_empty() {
            return Err(AppError::bad_request(
                "Owner identifier is required",
                json!({ "field": "owner" }),
            ));
        }

        let code = match custom {
            Some(code) => self.check_custom(code).await?,
            None => self.find_free_candidate().await?,
        };

        self.commit(code, original_url, owner).await
    }

    async fn check_custom(&self, code: ShortCode) -> Result<ShortCode, AppError> {
        if self.probe(code.as_str()).await? {
            counter!("shortener_allocations_total", "mode" => "custom", "outcome" => "conflict")
                .increment(1);
            return Err(AppError::conflict(
                "This custom code is already taken",
                json!({ "code": code.as_str() }),
            ));
        }

        Ok(code)
    }

    async fn find_free_candidate(&self) -> Result<ShortCode, AppError> {
        for attempt in 1..=self.settings.max_attempts {
            let candidate = ShortCode::generate(self.settings.code_length);

            if !self.probe(candidate.as_str()).await? {
                return Ok(candidate);
            }

            counter!("shortener_code_collisions_total").increment(1);
            debug!(
                "Generated code '{}' already taken (attempt {}/{})",
                candidate, attempt, self.settings.max_attempts
            );
        }

        counter!("shortener_allocations_total", "mode" => "generated", "outcome" => "exhausted")
            .increment(1);
        warn!(
            "No free code found after {} attempts",
            self.settings.max_attempts
        );

        Err(AppError::exhausted(
            "Failed to generate unique short code",
            json!({
                "attempts": self.settings.max_attempts,
                "code_length": self.settings.code_length,
            }),
        ))
    }

    async fn probe(&self, code: &str) -> Result<bool, AppError> {
        self.registry.exists(code).await.map_err(|e| {
            warn!("Registry probe for '{}' failed: {}", code, e);
            AppError::unavailable(
                "Registry is unavailable",
                json!({ "reason": e.to_string(), "kind": e.kind() }),
            )
        })
    }

    async fn commit(
        &self,
        code: ShortCode,
        original_url: &str,
        owner: &str,
    ) -> Result<Allocation, AppError> {
        let origin = code.origin();

        if let Err(e) = self.registry.put(code.as_str(), original_url, owner).await {
            counter!("shortener_allocations_total", "mode" => origin.as_str(), "outcome" => "commit_failed")
                .increment(1);
            return Err(commit_error(&code, &e));
        }

        counter!("shortener_allocations_total", "mode" => origin.as_str(), "outcome" => "committed")
            .increment(1);
        info!("Allocated {} code '{}' for {}", origin.as_str(), code, owner);

        Ok(Allocation {
            code: code.into_string(),
            original_url: original_url.to_string(),
            owner: owner.to_string(),
            origin,
        })
    }
}

fn commit_error(code: &ShortCode, error: &RegistryError) -> AppError {
    warn!("Registry write for '{}' failed: {}", code, error);

    let message = match error {
        RegistryError::Duplicate(_) => "Short code was registered concurrently",
        RegistryError::Unauthorized(_) => "Service is not authorized to write to the registry",
        RegistryError::InvalidOwner(_) => "Owner identifier was rejected by the registry",
        _ => "Failed to store URL",
    };

    AppError::commit(
        message,
        json!({
            "code": code.as_str(),
            "mode": code.origin().as_str(),
            "kind": error.kind(),
            "reason": error.to_string(),
        }),
    )
}
