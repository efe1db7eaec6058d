//! HTTP request handlers.

pub mod app;
pub mod auth;
pub mod files;
pub mod users;

pub use app::*;
pub use auth::*;
pub use files::*;
pub use users::*;
