//! Session endpoints.

use crate::auth::require_auth;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use base64::Engine;
use base64::engine::general_purpose;
use cabinet_service::ServiceError;
use serde::Serialize;

/// Response carrying a fresh session token.
#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub token: String,
}

/// Parse Basic credentials from the Authorization header.
///
/// Every malformed shape collapses into `InvalidCredentials` so probes
/// cannot distinguish a bad header from a bad password.
fn parse_basic_credentials(req: &Request) -> ApiResult<(String, String)> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ServiceError::InvalidCredentials)?;

    // RFC 7617: the scheme is case-insensitive.
    let encoded = if header.len() >= 6 && header[..6].eq_ignore_ascii_case("basic ") {
        header[6..].trim()
    } else {
        return Err(ServiceError::InvalidCredentials.into());
    };

    let decoded = general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| ServiceError::InvalidCredentials)?;
    let decoded = String::from_utf8(decoded).map_err(|_| ServiceError::InvalidCredentials)?;

    let (email, password) = decoded
        .split_once(':')
        .ok_or(ServiceError::InvalidCredentials)?;

    Ok((email.to_string(), password.to_string()))
}

/// GET /connect - Open a session with Basic credentials.
pub async fn connect(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<ConnectResponse>> {
    let (email, password) = parse_basic_credentials(&req)?;
    let token = state.sessions.authenticate(&email, &password).await?;

    Ok(Json(ConnectResponse { token }))
}

/// GET /disconnect - Close the presented session.
///
/// Succeeds with 204 and no body. A token that stopped resolving between
/// the auth middleware and here reports 401 like any other dead token.
pub async fn disconnect(State(state): State<AppState>, req: Request) -> ApiResult<StatusCode> {
    let auth = require_auth(&req)?;

    if state.sessions.revoke(&auth.token).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServiceError::Unauthorized.into())
    }
}
