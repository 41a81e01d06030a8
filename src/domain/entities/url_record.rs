//! Registry records and allocation results.

use chrono::{DateTime, Utc};

use super::short_code::CodeOrigin;

/// A committed code → URL mapping as stored by the registry.
///
/// Records are written once and never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub original_url: String,
    pub creator: String,
    pub created_at: DateTime<Utc>,
}

impl UrlRecord {
    pub fn new(original_url: String, creator: String, created_at: DateTime<Utc>) -> Self {
        Self {
            original_url,
            creator,
            created_at,
        }
    }

    /// Whole days elapsed between creation and `now`, never negative.
    pub fn days_since_creation(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_days().max(0)
    }
}

/// Outcome of a successful allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub code: String,
    pub original_url: String,
    pub owner: String,
    pub origin: CodeOrigin,
}

impl Allocation {
    pub fn is_custom(&self) -> bool {
        self.origin == CodeOrigin::Custom
    }
}
