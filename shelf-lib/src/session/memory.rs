//! In-memory session backend using DashMap

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use super::SessionBackend;
use crate::error::SessionError;

/// Process-local session storage.
///
/// Clones share the same map, so a test can keep a handle and inspect what
/// the view wrote.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    store: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    /// Creates a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[async_trait]
impl SessionBackend for MemoryBackend {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, SessionError> {
        Ok(self.store.get(key).map(|entry| entry.value().clone()))
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), SessionError> {
        self.store.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SessionError> {
        self.store.remove(key);
        Ok(())
    }
}
