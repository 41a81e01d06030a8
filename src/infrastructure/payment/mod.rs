//! Payment facilitator integration.
//!
//! Provides a [`PaymentFacilitator`] trait with one implementation:
//! - [`HttpFacilitator`] - Remote x402 facilitator over HTTPS

mod http_facilitator;
mod service;

pub use http_facilitator::HttpFacilitator;
pub use service::{
    PaymentError, PaymentFacilitator, PaymentRequirements, SettleResponse, VerifyResponse,
    X402_VERSION,
};

#[cfg(test)]
pub use service::MockPaymentFacilitator;
