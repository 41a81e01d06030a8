//! HTTP middleware for request processing and protection.
//!
//! Provides payment gating, rate limiting, and observability middleware.

pub mod payment;
pub mod rate_limit;
pub mod tracing;
