//! Session cache trait definition and background cleanup.

use crate::error::SessionResult;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// A cache mapping live session tokens to identity emails.
///
/// Entries expire after their TTL. Reads never extend a session's lifetime;
/// a token is valid from login until expiry or explicit invalidation, no
/// matter how often it is used.
#[async_trait]
pub trait SessionCache: Send + Sync + 'static {
    /// Store a session token with a time-to-live.
    async fn set(&self, token: &str, email: &str, ttl: Duration) -> SessionResult<()>;

    /// Look up the email for a token. Returns `None` for unknown or expired
    /// tokens.
    async fn get(&self, token: &str) -> SessionResult<Option<String>>;

    /// Invalidate a token. Returns `true` if a live session was removed.
    async fn delete(&self, token: &str) -> SessionResult<bool>;

    /// Remove expired entries and return how many were evicted.
    ///
    /// Backends with native expiry can keep the default no-op.
    fn evict_expired(&self) -> usize {
        0
    }

    /// Get the name of this cache backend.
    fn backend_name(&self) -> &'static str;

    /// Check that the backend is usable.
    async fn health_check(&self) -> SessionResult<()> {
        Ok(())
    }
}

/// Spawn a background task that periodically evicts expired sessions.
///
/// Expiry is already enforced lazily on every read; this task only bounds
/// the memory held by tokens that are never looked up again.
pub fn spawn_cleanup_task(
    cache: Arc<dyn SessionCache>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let evicted = cache.evict_expired();
            if evicted > 0 {
                tracing::info!(
                    evicted = evicted,
                    "Session cleanup task evicted expired sessions"
                );
            }
        }
    })
}
