//! Registry backends.
//!
//! - [`EvmRegistry`] - URL storage contract reached over JSON-RPC
//! - [`InMemoryRegistry`] - process-local store for development and tests

mod evm_registry;
mod memory_registry;

pub use evm_registry::{EvmRegistry, RegistryStats};
pub use memory_registry::InMemoryRegistry;
