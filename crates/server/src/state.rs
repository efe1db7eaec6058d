//! Application state shared across handlers.

use cabinet_core::config::AppConfig;
use cabinet_metadata::MetadataStore;
use cabinet_service::{FileService, SessionManager};
use cabinet_sessions::SessionCache;
use cabinet_storage::BlobStore;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Metadata store for users and file records.
    pub metadata: Arc<dyn MetadataStore>,
    /// Blob store for file content.
    pub blobs: Arc<dyn BlobStore>,
    /// Session token cache.
    pub session_cache: Arc<dyn SessionCache>,
    /// Registration and session lifecycle service.
    pub sessions: Arc<SessionManager>,
    /// File upload and retrieval service.
    pub files: Arc<FileService>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Panics
    ///
    /// Panics if configuration validation fails.
    pub fn new(
        config: AppConfig,
        metadata: Arc<dyn MetadataStore>,
        blobs: Arc<dyn BlobStore>,
        session_cache: Arc<dyn SessionCache>,
    ) -> Self {
        if let Err(error) = config.validate() {
            panic!("Invalid configuration: {}", error);
        }

        let sessions = Arc::new(SessionManager::new(metadata.clone(), session_cache.clone()));
        let files = Arc::new(FileService::new(metadata.clone(), blobs.clone()));

        Self {
            config: Arc::new(config),
            metadata,
            blobs,
            session_cache,
            sessions,
            files,
        }
    }

    /// Cleanup interval for the session eviction task.
    ///
    /// Config validation rejects a zero interval, so this is always a
    /// usable tokio timer period.
    pub fn session_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.config.sessions.cleanup_interval_secs)
    }
}
