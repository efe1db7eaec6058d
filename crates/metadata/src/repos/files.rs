//! File repository.

use crate::error::MetadataResult;
use crate::models::{FileRow, NewFile};
use async_trait::async_trait;

/// Repository for file operations.
///
/// All listing and lookup operations except [`get_file_by_id`] are scoped to
/// an owner; one user's records are invisible to another user's queries.
///
/// [`get_file_by_id`]: FileRepo::get_file_by_id
#[async_trait]
pub trait FileRepo: Send + Sync {
    /// Insert a file record and return it with its assigned id.
    async fn create_file(&self, file: &NewFile) -> MetadataResult<FileRow>;

    /// Get a file by id, scoped to an owner.
    async fn get_file(&self, file_id: i64, owner_id: i64) -> MetadataResult<Option<FileRow>>;

    /// Get a file by id regardless of owner.
    ///
    /// Used for content reads, where visibility depends on the `is_public`
    /// flag rather than ownership alone.
    async fn get_file_by_id(&self, file_id: i64) -> MetadataResult<Option<FileRow>>;

    /// List an owner's files under a parent, ordered by file id ascending.
    async fn list_files(
        &self,
        owner_id: i64,
        parent_id: i64,
        limit: i64,
        offset: i64,
    ) -> MetadataResult<Vec<FileRow>>;

    /// Count all file records.
    async fn count_files(&self) -> MetadataResult<u64>;
}
