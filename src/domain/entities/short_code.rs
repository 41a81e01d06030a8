//! Short code value type.

use std::fmt;

use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_custom_code};

/// How a short code came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeOrigin {
    /// Drawn at random by the allocator.
    Generated,
    /// Supplied by the caller.
    Custom,
}

impl CodeOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeOrigin::Generated => "generated",
            CodeOrigin::Custom => "custom",
        }
    }
}

/// A short identifier mapping to a long URL.
///
/// Values are only built through [`ShortCode::generate`] and
/// [`ShortCode::custom`], so every instance is alphanumeric and within the
/// accepted length bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortCode {
    value: String,
    origin: CodeOrigin,
}

impl ShortCode {
    /// Draws a fresh random candidate of `length` characters.
    pub fn generate(length: usize) -> Self {
        Self {
            value: generate_code(length),
            origin: CodeOrigin::Generated,
        }
    }

    /// Wraps a caller-supplied code after checking its format.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the code is not 3-20 ASCII
    /// letters or digits.
    pub fn custom(code: &str) -> Result<Self, AppError> {
        validate_custom_code(code)?;
        Ok(Self {
            value: code.to_string(),
            origin: CodeOrigin::Custom,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn origin(&self) -> CodeOrigin {
        self.origin
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.value
    }
}
