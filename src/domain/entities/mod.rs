//! Core domain entities.
//!
//! - [`ShortCode`] - A validated or generated short identifier
//! - [`UrlRecord`] - A committed mapping as stored by the registry
//! - [`Allocation`] - The result handed back to callers after a commit

pub mod short_code;
pub mod url_record;

pub use short_code::{CodeOrigin, ShortCode};
pub use url_record::{Allocation, UrlRecord};
