//! Session cache error types.

use thiserror::Error;

/// Session cache errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session backend error: {0}")]
    Backend(String),
}

/// Result type for session cache operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;
