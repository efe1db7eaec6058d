//! Blob storage abstraction and backends for Cabinet.
//!
//! File and image content lives here as opaque blobs, keyed by identifiers
//! the metadata layer hands out. The only backend is the local filesystem;
//! the [`BlobStore`] trait keeps the seam open for others.

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::filesystem::FilesystemBackend;
pub use error::{StorageError, StorageResult};
pub use traits::BlobStore;

use cabinet_core::StorageConfig;
use std::sync::Arc;

/// Create a blob store from configuration.
pub fn from_config(config: &StorageConfig) -> StorageResult<Arc<dyn BlobStore>> {
    config.validate().map_err(StorageError::Config)?;

    match config {
        StorageConfig::Filesystem { root } => Ok(Arc::new(FilesystemBackend::new(root))),
    }
}
