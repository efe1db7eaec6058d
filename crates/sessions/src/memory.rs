//! In-process session cache backed by a concurrent map.

use crate::cache::SessionCache;
use crate::error::SessionResult;
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};

/// A cached session.
struct SessionEntry {
    email: String,
    expires_at: Instant,
}

/// In-memory session cache.
///
/// Sessions are process-local: a restart logs everyone out. Expired entries
/// are dropped lazily on read and swept by [`evict_expired`].
///
/// [`evict_expired`]: SessionCache::evict_expired
#[derive(Default)]
pub struct MemorySessionCache {
    entries: DashMap<String, SessionEntry>,
}

impl MemorySessionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current number of tracked entries, expired ones included.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[async_trait]
impl SessionCache for MemorySessionCache {
    async fn set(&self, token: &str, email: &str, ttl: Duration) -> SessionResult<()> {
        self.entries.insert(
            token.to_string(),
            SessionEntry {
                email: email.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, token: &str) -> SessionResult<Option<String>> {
        let now = Instant::now();

        match self.entries.get(token) {
            None => return Ok(None),
            Some(entry) if now < entry.expires_at => {
                return Ok(Some(entry.email.clone()));
            }
            Some(_) => {}
        }

        // The entry was expired. Atomically remove it only if it is still
        // expired; a concurrent set may have replaced it with a fresh one.
        self.entries.remove_if(token, |_, entry| entry.expires_at <= now);
        Ok(None)
    }

    async fn delete(&self, token: &str) -> SessionResult<bool> {
        Ok(self.entries.remove(token).is_some())
    }

    fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut evicted = 0;

        // Collect candidates first, then use remove_if for atomic removal.
        // This prevents the race where an entry is refreshed between
        // collection and removal.
        let stale: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.value().expires_at <= now)
            .map(|entry| entry.key().clone())
            .collect();

        for token in stale {
            if self
                .entries
                .remove_if(&token, |_, entry| entry.expires_at <= now)
                .is_some()
            {
                evicted += 1;
            }
        }

        evicted
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
