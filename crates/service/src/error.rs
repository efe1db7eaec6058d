//! Domain error kinds for the service layer.

use cabinet_metadata::MetadataError;
use cabinet_sessions::SessionError;
use cabinet_storage::StorageError;
use thiserror::Error;

/// Errors produced by the session and file services.
///
/// The first group are domain kinds callers are expected to branch on; the
/// HTTP layer maps each to a status code. The trailing variants wrap store
/// failures and surface as internal errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No session token was provided.
    #[error("no session token provided")]
    MissingToken,

    /// The session token is unknown or expired.
    #[error("invalid or expired session token")]
    Unauthorized,

    /// Email/password pair does not match a registered identity.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Registration without an email.
    #[error("email is required")]
    MissingEmail,

    /// Registration without a password.
    #[error("password is required")]
    MissingPassword,

    /// Upload without a file name.
    #[error("file name is required")]
    MissingName,

    /// Upload without a valid kind.
    #[error("file type must be one of folder, file, image")]
    MissingType,

    /// Upload of a file or image without decodable content.
    #[error("file data is required and must be valid base64")]
    MissingData,

    /// The requested parent does not exist for this owner.
    #[error("parent folder {0} not found")]
    ParentNotFound(i64),

    /// The requested parent exists but is not a folder.
    #[error("parent {0} is not a folder")]
    ParentNotAFolder(i64),

    /// The file does not exist, or is not visible to the caller.
    #[error("file {0} not found")]
    NotFound(i64),

    /// The entity already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Content was requested for a folder.
    #[error("folder {0} has no content")]
    FolderHasNoContent(i64),

    /// Metadata store failure.
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Blob store failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Session cache failure.
    #[error("session cache error: {0}")]
    Session(#[from] SessionError),
}

/// Result type for service operations.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
