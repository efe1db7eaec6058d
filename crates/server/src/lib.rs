//! HTTP API server for the Cabinet file store.
//!
//! This crate provides the HTTP surface:
//! - Account registration and lookup
//! - Session open/close over Basic credentials
//! - File and folder creation
//! - Metadata lookup and paginated listings
//! - Content download with guessed content types
//! - Store health and usage reporting

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::AuthenticatedUser;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
