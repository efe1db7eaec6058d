//! Account endpoints.

use crate::auth::require_auth;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use cabinet_metadata::UserRow;
use serde::{Deserialize, Serialize};

/// Maximum request body size for account endpoints (64 KiB).
const MAX_ACCOUNT_BODY_SIZE: usize = 64 * 1024;

/// Request body for registration.
///
/// Both fields are optional at the wire level so that absence surfaces as
/// a domain error instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Response describing an account. The password hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.user_id,
            email: row.email,
        }
    }
}

/// POST /users - Register a new account.
pub async fn register(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let body: RegisterRequest = {
        let bytes = axum::body::to_bytes(req.into_body(), MAX_ACCOUNT_BODY_SIZE)
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read body: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::BadRequest(format!("invalid JSON: {e}")))?
    };

    let email = body.email.unwrap_or_default();
    let password = body.password.unwrap_or_default();

    let user = state.sessions.register(&email, &password).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /users/me - Return the authenticated account.
pub async fn me(req: Request) -> ApiResult<Json<UserResponse>> {
    let auth = require_auth(&req)?;
    Ok(Json(auth.user.clone().into()))
}
