//! Process-local registry for development and tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::{RegistryError, UrlRegistry};

/// A registry kept in memory.
///
/// `put` performs an atomic insert-if-absent under the write lock, which is
/// the behavior the allocator expects from every backend. Contents are lost
/// when the process exits.
#[derive(Default)]
pub struct InMemoryRegistry {
    records: RwLock<HashMap<String, UrlRecord>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        debug!("Using in-memory registry");
        Self::default()
    }

    /// Number of committed mappings.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl UrlRegistry for InMemoryRegistry {
    async fn exists(&self, code: &str) -> Result<bool, RegistryError> {
        Ok(self.records.read().await.contains_key(code))
    }

    async fn put(&self, code: &str, url: &str, owner: &str) -> Result<(), RegistryError> {
        let mut records = self.records.write().await;

        match records.entry(code.to_string()) {
            Entry::Occupied(_) => Err(RegistryError::Duplicate(code.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(UrlRecord::new(
                    url.to_string(),
                    owner.to_string(),
                    Utc::now(),
                ));
                Ok(())
            }
        }
    }

    async fn get(&self, code: &str) -> Result<Option<UrlRecord>, RegistryError> {
        Ok(self.records.read().await.get(code).cloned())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
