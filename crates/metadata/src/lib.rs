//! Metadata persistence for the Cabinet file backend.
//!
//! Stores user accounts and file records behind repository traits so the
//! service layer never touches SQL directly. The SQLite implementation is
//! the only backend; the traits keep the seam open for others.

pub mod error;
pub mod models;
pub mod repos;
pub mod store;

pub use error::{MetadataError, MetadataResult};
pub use models::{FileRow, NewFile, UserRow};
pub use repos::{FileRepo, UserRepo};
pub use store::{MetadataStore, SqliteStore};

use cabinet_core::MetadataConfig;
use std::sync::Arc;

/// Build a metadata store from configuration.
pub async fn from_config(config: &MetadataConfig) -> MetadataResult<Arc<dyn MetadataStore>> {
    match config {
        MetadataConfig::Sqlite { path } => {
            let store = SqliteStore::new(path).await?;
            Ok(Arc::new(store))
        }
    }
}
