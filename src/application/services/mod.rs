//! Business logic services for the application layer.

pub mod allocator;
pub mod lookup_service;

pub use allocator::{AllocatorSettings, CodeAllocator, DEFAULT_MAX_ATTEMPTS};
pub use lookup_service::LookupService;
