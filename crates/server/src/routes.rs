//! Route configuration.

use crate::auth::auth_middleware;
use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        // Service introspection (intentionally unauthenticated for probes)
        .route("/status", get(handlers::status))
        .route("/stats", get(handlers::stats))
        // Accounts and sessions
        .route("/users", post(handlers::register))
        .route("/users/me", get(handlers::me))
        .route("/connect", get(handlers::connect))
        .route("/disconnect", get(handlers::disconnect))
        // Files
        .route("/files", post(handlers::upload_file).get(handlers::list_files))
        .route("/files/{file_id}", get(handlers::show_file))
        .route("/files/{file_id}/data", get(handlers::read_file_data));

    // Middleware layers are applied in reverse order (outermost first).
    // Order of execution: TraceLayer -> Auth -> Handler
    router
        // Auth middleware (resolves token and sets AuthenticatedUser extension)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
