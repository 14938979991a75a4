//! Session backend trait.

use async_trait::async_trait;

use crate::error::SessionError;

/// Backend trait for session storage.
///
/// Implementations handle raw byte storage/retrieval.
/// [`super::SessionStore`] wraps this with typed JSON encoding.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Get raw bytes for a key.
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, SessionError>;

    /// Set raw bytes for a key.
    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), SessionError>;

    /// Delete a key.
    async fn delete(&self, key: &str) -> Result<(), SessionError>;
}
