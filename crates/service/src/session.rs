//! Session lifecycle: registration, login, token resolution, logout.

use crate::error::{ServiceError, ServiceResult};
use cabinet_core::{SESSION_TTL_SECS, generate_session_token, hash_password, verify_password};
use cabinet_metadata::{MetadataError, MetadataStore, UserRow};
use cabinet_sessions::SessionCache;
use std::sync::Arc;
use std::time::Duration;

/// Orchestrates the credential store and the session cache.
///
/// A session moves `Absent -> Active` on [`authenticate`] and back to
/// `Absent` on [`revoke`] or TTL expiry. There is no renewal; resolving a
/// token never extends its lifetime.
///
/// [`authenticate`]: SessionManager::authenticate
/// [`revoke`]: SessionManager::revoke
pub struct SessionManager {
    store: Arc<dyn MetadataStore>,
    sessions: Arc<dyn SessionCache>,
}

impl SessionManager {
    /// Create a session manager over the given stores.
    pub fn new(store: Arc<dyn MetadataStore>, sessions: Arc<dyn SessionCache>) -> Self {
        Self { store, sessions }
    }

    /// Register a new identity.
    ///
    /// The unique-email constraint is also enforced by the store, so a
    /// registration race surfaces as `AlreadyExists` rather than a duplicate
    /// row.
    pub async fn register(&self, email: &str, password: &str) -> ServiceResult<UserRow> {
        if email.is_empty() {
            return Err(ServiceError::MissingEmail);
        }
        if password.is_empty() {
            return Err(ServiceError::MissingPassword);
        }

        let user = self
            .store
            .create_user(email, &hash_password(password))
            .await
            .map_err(|e| match e {
                MetadataError::AlreadyExists(_) => {
                    ServiceError::AlreadyExists(format!("user '{email}'"))
                }
                other => other.into(),
            })?;

        tracing::info!(user_id = user.user_id, "registered new user");
        Ok(user)
    }

    /// Authenticate with email and password, returning a fresh session token.
    ///
    /// Unknown emails and wrong passwords both fail `InvalidCredentials`.
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<String> {
        let user = self
            .store
            .get_user_by_email(email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(ServiceError::InvalidCredentials);
        }

        let token = generate_session_token();
        self.sessions
            .set(&token, &user.email, Duration::from_secs(SESSION_TTL_SECS))
            .await?;

        tracing::info!(user_id = user.user_id, "opened session");
        Ok(token)
    }

    /// Resolve a session token to the identity behind it.
    ///
    /// A token the cache does not know is `Unauthorized`; never-issued and
    /// expired tokens are indistinguishable.
    pub async fn resolve(&self, token: &str) -> ServiceResult<UserRow> {
        if token.is_empty() {
            return Err(ServiceError::MissingToken);
        }

        let email = self
            .sessions
            .get(token)
            .await?
            .ok_or(ServiceError::Unauthorized)?;

        // The identity behind a cached session may have vanished if the
        // database was swapped out from under a running process.
        self.store
            .get_user_by_email(&email)
            .await?
            .ok_or(ServiceError::Unauthorized)
    }

    /// Revoke a session token.
    ///
    /// Returns whether a live session was actually removed; revoking twice
    /// yields `false`, not an error.
    pub async fn revoke(&self, token: &str) -> ServiceResult<bool> {
        if token.is_empty() {
            return Err(ServiceError::MissingToken);
        }

        let removed = self.sessions.delete(token).await?;
        if removed {
            tracing::info!("closed session");
        }
        Ok(removed)
    }
}
