//! Database row types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// ===== Users =====

/// A registered identity.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRow {
    /// Unique user id.
    pub user_id: i64,
    /// Email address, unique across users.
    pub email: String,
    /// Hex-encoded password hash.
    pub password_hash: String,
    /// Creation timestamp.
    pub created_at: OffsetDateTime,
}

// ===== Files =====

/// A file, image, or folder record.
///
/// Folders carry no blob reference. The blob reference is internal and is
/// never serialized into API responses.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct FileRow {
    /// Unique file id.
    pub file_id: i64,
    /// Owner's user id.
    pub owner_id: i64,
    /// Display name.
    pub name: String,
    /// Kind discriminator ("folder", "file", or "image").
    pub kind: String,
    /// Parent folder id, or the root sentinel 0.
    pub parent_id: i64,
    /// Whether the content is readable without authentication.
    pub is_public: bool,
    /// Storage key of the content blob. `None` for folders.
    pub blob_ref: Option<String>,
    /// Creation timestamp.
    pub created_at: OffsetDateTime,
}

/// Fields required to insert a new file record.
#[derive(Clone, Debug)]
pub struct NewFile {
    /// Owner's user id.
    pub owner_id: i64,
    /// Display name.
    pub name: String,
    /// Kind discriminator ("folder", "file", or "image").
    pub kind: String,
    /// Parent folder id, or the root sentinel 0.
    pub parent_id: i64,
    /// Whether the content is readable without authentication.
    pub is_public: bool,
    /// Storage key of the content blob. `None` for folders.
    pub blob_ref: Option<String>,
}
