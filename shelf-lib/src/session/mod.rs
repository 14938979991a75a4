//! Persisted session: the displayed order and the selected ids.
//!
//! Two independently keyed records, each a JSON array of item ids, stored in a
//! [`SessionBackend`]. They are written after every mutation once the view has
//! finished initializing, and read once at startup.

mod backend;
mod memory;
mod sqlite;

pub use backend::SessionBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::SessionError;
use crate::model::ItemId;

/// Key of the selected-id record.
pub const SELECTED_KEY: &str = "selected";

/// Key of the display-order record.
pub const ORDER_KEY: &str = "sorted";

/// Typed access to the persisted session.
///
/// Wraps a [`SessionBackend`] with JSON encoding. Cheap to clone.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
}

impl SessionStore {
    /// Create a new session store with the given backend.
    pub fn new(backend: impl SessionBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Session store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Reads the persisted display order, if any.
    pub async fn load_order(&self) -> Result<Option<Vec<ItemId>>, SessionError> {
        self.get(ORDER_KEY).await
    }

    /// Reads the persisted selection. A missing record is an empty selection.
    pub async fn load_selected(&self) -> Result<Vec<ItemId>, SessionError> {
        Ok(self.get(SELECTED_KEY).await?.unwrap_or_default())
    }

    /// Writes the display order.
    pub async fn save_order(&self, ids: &[ItemId]) -> Result<(), SessionError> {
        self.set(ORDER_KEY, &ids).await
    }

    /// Writes the selection.
    pub async fn save_selected(&self, ids: &[ItemId]) -> Result<(), SessionError> {
        self.set(SELECTED_KEY, &ids).await
    }

    /// Removes both records.
    pub async fn clear(&self) -> Result<(), SessionError> {
        self.backend.delete(ORDER_KEY).await?;
        self.backend.delete(SELECTED_KEY).await
    }

    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SessionError> {
        match self.backend.get_bytes(key).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|source| SessionError::Decode {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    async fn set<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), SessionError> {
        let bytes = serde_json::to_vec(value).map_err(|source| SessionError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.backend.set_bytes(key, bytes).await
    }
}
