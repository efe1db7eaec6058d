//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl ServerConfig {
    /// Validate server configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        if self.bind.trim().is_empty() {
            return Err("server.bind cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Storage backend configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Local filesystem storage, one file per blob.
    Filesystem {
        /// Root directory for blobs. Created lazily on first write.
        root: PathBuf,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Filesystem {
            root: PathBuf::from("./data/blobs"),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            StorageConfig::Filesystem { root } => {
                if root.as_os_str().is_empty() {
                    return Err("storage.root cannot be empty".to_string());
                }
                Ok(())
            }
        }
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataConfig {
    /// SQLite database.
    Sqlite {
        /// Database file path.
        path: PathBuf,
    },
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/cabinet.db"),
        }
    }
}

impl MetadataConfig {
    /// Validate metadata configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            MetadataConfig::Sqlite { path } => {
                if path.as_os_str().is_empty() {
                    return Err("metadata.path cannot be empty".to_string());
                }
                Ok(())
            }
        }
    }
}

/// Session cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Interval in seconds between background sweeps of expired sessions.
    /// Expiry is also enforced lazily on every read, so the sweep only
    /// bounds memory held by abandoned tokens.
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

fn default_cleanup_interval_secs() -> u64 {
    300
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl SessionConfig {
    /// Validate session configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        // A zero interval would panic when creating the cleanup timer.
        if self.cleanup_interval_secs == 0 {
            return Err(
                "sessions.cleanup_interval_secs cannot be 0; use a value >= 1 second".to_string(),
            );
        }
        Ok(())
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage backend configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Metadata store configuration.
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Session cache configuration.
    #[serde(default)]
    pub sessions: SessionConfig,
}

impl AppConfig {
    /// Validate the complete configuration.
    pub fn validate(&self) -> crate::Result<()> {
        self.server.validate().map_err(crate::Error::Config)?;
        self.storage.validate().map_err(crate::Error::Config)?;
        self.metadata.validate().map_err(crate::Error::Config)?;
        self.sessions.validate().map_err(crate::Error::Config)?;
        Ok(())
    }

    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Callers are expected to point the storage and
    /// metadata paths at a temporary directory.
    pub fn for_testing() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_sections_deserialize_with_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:5000");
        assert_eq!(config.sessions.cleanup_interval_secs, 300);
        match config.storage {
            StorageConfig::Filesystem { root } => {
                assert_eq!(root, PathBuf::from("./data/blobs"));
            }
        }
    }

    #[test]
    fn test_storage_config_tagged() {
        let json = r#"{"type":"filesystem","root":"/srv/cabinet/blobs"}"#;
        let config: StorageConfig = serde_json::from_str(json).unwrap();
        match config {
            StorageConfig::Filesystem { root } => {
                assert_eq!(root, PathBuf::from("/srv/cabinet/blobs"));
            }
        }
    }

    #[test]
    fn test_empty_bind_rejected() {
        let config = ServerConfig {
            bind: "  ".to_string(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_cleanup_interval_rejected() {
        let config = SessionConfig {
            cleanup_interval_secs: 0,
        };
        assert!(config.validate().is_err());
    }
}
