//! Service introspection endpoints.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

/// Health of each backing store.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub db: bool,
    pub sessions: bool,
    pub storage: bool,
}

/// GET /status - Probe every backing store.
///
/// Returns 200 only when all stores respond; any failure degrades the
/// response to 503 while still reporting the per-store breakdown.
/// Intentionally unauthenticated for load balancer probes.
pub async fn status(State(state): State<AppState>) -> (StatusCode, Json<StatusResponse>) {
    let db = state.metadata.health_check().await.is_ok();
    let sessions = state.session_cache.health_check().await.is_ok();
    let storage = state.blobs.health_check().await.is_ok();

    let code = if db && sessions && storage {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(StatusResponse { db, sessions, storage }))
}

/// Row counts over the metadata store.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub users: u64,
    pub files: u64,
}

/// GET /stats - Report account and file counts.
pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    let users = state.metadata.count_users().await?;
    let files = state.metadata.count_files().await?;

    Ok(Json(StatsResponse { users, files }))
}
