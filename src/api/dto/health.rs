//! DTOs for `GET /health`.

use serde::Serialize;

/// Overall status plus one entry per collaborator.
///
/// `status` is `"healthy"` when the registry answers and `"degraded"`
/// otherwise. The payment gate never degrades health; it only reports
/// whether paid routes are enforced.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    /// Reachability of the registry backend (latest block for the EVM backend).
    pub registry: CheckStatus,
    /// `"ok"` with the network when payments are enforced, `"disabled"` otherwise.
    pub payments: CheckStatus,
}

/// One collaborator's state: `"ok"`, `"error"` or `"disabled"`.
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self::with_status("ok", message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_status("error", message)
    }

    pub fn disabled(message: impl Into<String>) -> Self {
        Self::with_status("disabled", message)
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn with_status(status: &str, message: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            message: Some(message.into()),
        }
    }
}
