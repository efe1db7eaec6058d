//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;

/// The blob storage abstraction.
///
/// Keys are opaque identifiers chosen by the caller; the store never
/// interprets them beyond validation. All writes are atomic at the key
/// level.
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Check if a blob exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get a blob's content.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Put a blob atomically, replacing any existing content.
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()>;

    /// Delete a blob.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Get the name of this storage backend.
    ///
    /// Returns a static string identifier for the backend type
    /// (e.g., "filesystem"). Used for logging and status reporting.
    fn backend_name(&self) -> &'static str;

    /// Check that the backend is usable.
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}
