//! Blob store trait.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;

/// Abstraction over blob storage backends.
///
/// Keys are opaque relative paths assigned by the metadata layer
/// (`files.storage_key`). Deletes are idempotent at the call site:
/// implementations return [`StorageError::NotFound`] for missing
/// objects and callers decide whether that matters.
///
/// [`StorageError::NotFound`]: crate::error::StorageError::NotFound
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Check whether an object exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Store an object, replacing any existing object at the key.
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()>;

    /// Retrieve an object's contents.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Delete an object. Returns `NotFound` if it does not exist.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;

    /// Check backend health.
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}
