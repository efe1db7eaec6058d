//! File uploads, lookups, listings, and content reads.

use crate::error::{ServiceError, ServiceResult};
use base64::{Engine as _, engine::general_purpose};
use bytes::Bytes;
use cabinet_core::{FILE_PAGE_SIZE, FileKind, ROOT_PARENT_ID};
use cabinet_metadata::{FileRow, MetadataStore, NewFile, UserRow};
use cabinet_storage::{BlobStore, StorageError};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// An upload request as received from clients.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadRequest {
    /// Display name.
    pub name: Option<String>,
    /// Kind discriminator, `type` on the wire.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Base64-encoded content for files and images.
    pub data: Option<String>,
    /// Parent folder id; 0 targets the root.
    pub parent_id: i64,
    /// Whether the content is readable without authentication.
    pub is_public: bool,
}

/// Orchestrates the file metadata store and the blob store.
///
/// Records are immutable once created; there is no rename, move, delete, or
/// visibility toggle.
pub struct FileService {
    store: Arc<dyn MetadataStore>,
    blobs: Arc<dyn BlobStore>,
}

impl FileService {
    /// Create a file service over the given stores.
    pub fn new(store: Arc<dyn MetadataStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    /// Validate and persist an upload.
    ///
    /// Validation order, first violation wins: name, kind, content presence,
    /// then parent. Folders never touch the blob store. For files and images
    /// the blob is written before the metadata row; if the row insert fails
    /// the blob is deleted again so a failed upload leaves nothing behind. A
    /// crash between the two writes can still orphan a blob.
    pub async fn upload(&self, owner: &UserRow, request: UploadRequest) -> ServiceResult<FileRow> {
        let Some(name) = request.name.as_deref().filter(|n| !n.is_empty()) else {
            return Err(ServiceError::MissingName);
        };
        let kind = request
            .kind
            .as_deref()
            .and_then(|k| FileKind::parse(k).ok())
            .ok_or(ServiceError::MissingType)?;
        let payload = if kind.has_content() {
            let Some(data) = request.data.as_deref().filter(|d| !d.is_empty()) else {
                return Err(ServiceError::MissingData);
            };
            Some(data)
        } else {
            None
        };

        // Parent validity is a creation-time invariant for every kind,
        // folders included. The scoped lookup makes another owner's folder
        // indistinguishable from a missing one.
        if request.parent_id != ROOT_PARENT_ID {
            let parent = self
                .store
                .get_file(request.parent_id, owner.user_id)
                .await?
                .ok_or(ServiceError::ParentNotFound(request.parent_id))?;
            if parent.kind != FileKind::Folder.as_str() {
                return Err(ServiceError::ParentNotAFolder(request.parent_id));
            }
        }

        let Some(data) = payload else {
            let record = self
                .store
                .create_file(&NewFile {
                    owner_id: owner.user_id,
                    name: name.to_string(),
                    kind: kind.as_str().to_string(),
                    parent_id: request.parent_id,
                    is_public: request.is_public,
                    blob_ref: None,
                })
                .await?;
            tracing::info!(file_id = record.file_id, "created folder");
            return Ok(record);
        };

        let bytes = general_purpose::STANDARD
            .decode(data)
            .map_err(|_| ServiceError::MissingData)?;

        // Blob first, then metadata.
        let blob_ref = Uuid::new_v4().to_string();
        self.blobs.put(&blob_ref, Bytes::from(bytes)).await?;

        let record = self
            .store
            .create_file(&NewFile {
                owner_id: owner.user_id,
                name: name.to_string(),
                kind: kind.as_str().to_string(),
                parent_id: request.parent_id,
                is_public: request.is_public,
                blob_ref: Some(blob_ref.clone()),
            })
            .await;

        match record {
            Ok(record) => {
                tracing::info!(
                    file_id = record.file_id,
                    kind = record.kind,
                    "created file"
                );
                Ok(record)
            }
            Err(e) => {
                // Compensate for the blob-first ordering so a failed insert
                // does not leave an orphaned blob behind.
                if let Err(del) = self.blobs.delete(&blob_ref).await {
                    tracing::warn!(blob_ref, error = %del, "failed to delete blob after metadata failure");
                }
                Err(e.into())
            }
        }
    }

    /// Look up a single record owned by the caller.
    pub async fn show(&self, owner: &UserRow, file_id: i64) -> ServiceResult<FileRow> {
        self.store
            .get_file(file_id, owner.user_id)
            .await?
            .ok_or(ServiceError::NotFound(file_id))
    }

    /// List the page-th window of the caller's records under a parent.
    ///
    /// Pages are 0-indexed windows of [`FILE_PAGE_SIZE`] records in id order;
    /// out-of-range pages yield an empty vec.
    pub async fn list(
        &self,
        owner: &UserRow,
        parent_id: i64,
        page: i64,
    ) -> ServiceResult<Vec<FileRow>> {
        if page < 0 {
            return Ok(Vec::new());
        }
        let rows = self
            .store
            .list_files(owner.user_id, parent_id, FILE_PAGE_SIZE, page * FILE_PAGE_SIZE)
            .await?;
        Ok(rows)
    }

    /// Read a record's content.
    ///
    /// The one operation where `is_public` is consulted and anonymous access
    /// is legal: private records are only readable by their owner and look
    /// missing to everyone else. Folders have no content.
    pub async fn read_content(
        &self,
        viewer: Option<&UserRow>,
        file_id: i64,
    ) -> ServiceResult<(FileRow, Bytes)> {
        let record = self
            .store
            .get_file_by_id(file_id)
            .await?
            .ok_or(ServiceError::NotFound(file_id))?;

        let is_owner = viewer.is_some_and(|v| v.user_id == record.owner_id);
        if !record.is_public && !is_owner {
            return Err(ServiceError::NotFound(file_id));
        }

        // Folders are the only records without a blob reference.
        let Some(blob_ref) = record.blob_ref.as_deref() else {
            return Err(ServiceError::FolderHasNoContent(file_id));
        };

        match self.blobs.get(blob_ref).await {
            Ok(bytes) => Ok((record, bytes)),
            Err(StorageError::NotFound(_)) => Err(ServiceError::NotFound(file_id)),
            Err(e) => Err(e.into()),
        }
    }
}
