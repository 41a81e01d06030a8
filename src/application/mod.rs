//! Application layer services implementing business logic.
//!
//! Services consume the [`UrlRegistry`](crate::domain::repositories::UrlRegistry)
//! trait and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::allocator::CodeAllocator`] - Short code allocation and commit
//! - [`services::lookup_service::LookupService`] - Code resolution with read retries

pub mod services;
