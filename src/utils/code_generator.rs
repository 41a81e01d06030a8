//! Short code generation and validation utilities.
//!
//! Generated codes are drawn uniformly from `[A-Za-z0-9]` using the
//! thread-local CSPRNG, so they cannot be enumerated by observing earlier
//! codes. Custom codes supplied by callers must match [`CUSTOM_CODE_PATTERN`].

use crate::error::AppError;
use rand::{Rng, distr::Alphanumeric};
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Length of generated codes unless configured otherwise.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Shortest accepted custom code.
pub const CUSTOM_CODE_MIN_LENGTH: usize = 3;

/// Longest accepted custom code.
pub const CUSTOM_CODE_MAX_LENGTH: usize = 20;

/// Pattern every custom code must match (case-sensitive).
pub const CUSTOM_CODE_PATTERN: &str = r"^[a-zA-Z0-9]{3,20}$";

pub static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CUSTOM_CODE_PATTERN).expect("custom code pattern is valid"));

/// Generates a random alphanumeric short code of `length` characters.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 3-20 characters
/// - Allowed characters: ASCII letters and digits, case preserved
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    let length = code.chars().count();
    if !(CUSTOM_CODE_MIN_LENGTH..=CUSTOM_CODE_MAX_LENGTH).contains(&length) {
        return Err(AppError::bad_request(
            "Custom code must be 3-20 alphanumeric characters",
            json!({ "provided_length": length }),
        ));
    }

    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(AppError::bad_request(
            "Custom code can only contain letters and digits",
            json!({ "code": code }),
        ));
    }

    Ok(())
}

/// Returns true if `code` could have been issued by this service.
///
/// Used on lookup paths to reject garbage before it reaches the registry.
pub fn is_well_formed(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= CUSTOM_CODE_MAX_LENGTH
        && code.chars().all(|c| c.is_ascii_alphanumeric())
}
