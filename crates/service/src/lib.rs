//! Domain services for the Cabinet file backend.
//!
//! Two orchestrators over the injected stores:
//!
//! - [`SessionManager`]: registration, login, token resolution, logout
//! - [`FileService`]: uploads, lookups, paginated listings, content reads
//!
//! Neither holds state of its own; everything lives in the stores, so any
//! number of request handlers can share one instance.

pub mod error;
pub mod files;
pub mod session;

pub use error::{ServiceError, ServiceResult};
pub use files::{FileService, UploadRequest};
pub use session::SessionManager;
