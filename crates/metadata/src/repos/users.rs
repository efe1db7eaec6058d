//! User repository.

use crate::error::MetadataResult;
use crate::models::UserRow;
use async_trait::async_trait;

/// Repository for user operations.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Create a user. Fails with `AlreadyExists` if the email is taken.
    async fn create_user(&self, email: &str, password_hash: &str) -> MetadataResult<UserRow>;

    /// Get a user by id.
    async fn get_user(&self, user_id: i64) -> MetadataResult<Option<UserRow>>;

    /// Get a user by email.
    async fn get_user_by_email(&self, email: &str) -> MetadataResult<Option<UserRow>>;

    /// Count all users.
    async fn count_users(&self) -> MetadataResult<u64>;
}
