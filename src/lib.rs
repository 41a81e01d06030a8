//! # On-chain URL Shortener
//!
//! A pay-per-use URL shortening service whose code → URL mappings live in
//! an external registry, normally a URL storage contract on an EVM chain.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Short codes, registry records and the registry trait
//! - **Application Layer** ([`application`]) - Code allocation and resolution
//! - **Infrastructure Layer** ([`infrastructure`]) - EVM and in-memory registries, payment facilitator
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Random 6-character codes with bounded collision retries
//! - Custom codes (3-20 alphanumeric characters, case-sensitive)
//! - x402 payments verified and settled by a remote facilitator
//! - Rate limiting and structured logging
//!
//! ## Quick Start
//!
//! ```bash
//! # Local development without a chain or payments
//! export REGISTRY_BACKEND=memory
//! cargo run
//!
//! # Against a deployed contract
//! export CONTRACT_ADDRESS="0x..."
//! export SERVER_PRIVATE_KEY="0x..."
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{AllocatorSettings, CodeAllocator, LookupService};
    pub use crate::domain::entities::{Allocation, CodeOrigin, ShortCode, UrlRecord};
    pub use crate::domain::repositories::{RegistryError, UrlRegistry};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
