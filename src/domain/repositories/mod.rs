//! Collaborator traits for the domain layer.
//!
//! The registry is the only persistent state the service touches. It lives
//! outside the process, so it is modelled as an injected trait with
//! implementations in `crate::infrastructure::registry`.
//!
//! Mock implementations are auto-generated via `mockall` for testing.

pub mod url_registry;

pub use url_registry::{RegistryError, UrlRegistry};

#[cfg(test)]
pub use url_registry::MockUrlRegistry;
