//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete clients for the services the application depends on.
//!
//! # Modules
//!
//! - [`registry`] - Registry backends (EVM contract and in-memory)
//! - [`payment`] - Payment facilitator client

pub mod payment;
pub mod registry;
