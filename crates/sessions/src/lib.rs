//! Session caching for the Cabinet file backend.
//!
//! Tracks live session tokens and the identity email behind each one. The
//! in-memory backend is the only implementation; the [`SessionCache`] trait
//! keeps the seam open for a shared cache.

pub mod cache;
pub mod error;
pub mod memory;

pub use cache::{SessionCache, spawn_cleanup_task};
pub use error::{SessionError, SessionResult};
pub use memory::MemorySessionCache;
