//! Utility functions for code generation, validation, and request handling.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`url_validator`] - Target URL validation
//! - [`payment_codec`] - Payment header encoding and price parsing
//! - [`extract_payer`] - Owner resolution from request context

pub mod code_generator;
pub mod extract_payer;
pub mod payment_codec;
pub mod url_validator;
