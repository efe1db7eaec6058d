//! Server test utilities.

use cabinet_core::config::{AppConfig, MetadataConfig, StorageConfig};
use cabinet_metadata::{MetadataStore, SqliteStore};
use cabinet_server::{AppState, create_router};
use cabinet_sessions::{MemorySessionCache, SessionCache};
use cabinet_storage::{BlobStore, FilesystemBackend};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    blob_root: PathBuf,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with temporary storage.
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        // Blob storage; the backend creates the root on first write
        let blob_root = temp_dir.path().join("blobs");
        let blobs: Arc<dyn BlobStore> = Arc::new(FilesystemBackend::new(&blob_root));

        // Metadata store
        let db_path = temp_dir.path().join("metadata.db");
        let store = SqliteStore::new(&db_path)
            .await
            .expect("Failed to create metadata store");
        store.migrate().await.expect("Failed to apply schema");
        let metadata: Arc<dyn MetadataStore> = Arc::new(store);

        // Session cache
        let session_cache: Arc<dyn SessionCache> = Arc::new(MemorySessionCache::new());

        let mut config = AppConfig::for_testing();
        config.storage = StorageConfig::Filesystem {
            root: blob_root.clone(),
        };
        config.metadata = MetadataConfig::Sqlite { path: db_path };

        // Create state and router
        let state = AppState::new(config, metadata, blobs, session_cache);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            blob_root,
            _temp_dir: temp_dir,
        }
    }

    /// Get access to the underlying metadata.
    pub fn metadata(&self) -> Arc<dyn MetadataStore> {
        self.state.metadata.clone()
    }

    /// Root directory of the filesystem blob backend.
    pub fn blob_root(&self) -> &PathBuf {
        &self.blob_root
    }
}
