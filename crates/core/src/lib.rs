//! Core domain types and shared logic for the Cabinet file backend.
//!
//! This crate defines the model used across all other crates:
//! - File kinds and tree constants
//! - Password hashing and verification
//! - Session token generation
//! - Application configuration

pub mod config;
pub mod error;
pub mod file;
pub mod password;
pub mod token;

pub use config::{AppConfig, MetadataConfig, ServerConfig, SessionConfig, StorageConfig};
pub use error::{Error, Result};
pub use file::FileKind;
pub use password::{hash_password, verify_password};
pub use token::generate_session_token;

/// Parent id of records attached directly to the root of a user's tree.
pub const ROOT_PARENT_ID: i64 = 0;

/// Session lifetime: 24 hours.
pub const SESSION_TTL_SECS: u64 = 86_400;

/// Fixed page size for file listings.
pub const FILE_PAGE_SIZE: i64 = 20;
