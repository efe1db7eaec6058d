//! Authentication middleware.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use cabinet_metadata::UserRow;
use cabinet_service::ServiceError;

/// Header carrying the session token.
pub const TOKEN_HEADER: &str = "x-token";

/// Authenticated request extension.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    /// The resolved account.
    pub user: UserRow,
    /// The raw session token the request presented.
    pub token: String,
}

/// Extract the session token from the request headers.
fn extract_token(req: &Request) -> Option<String> {
    req.headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

/// Authentication middleware that resolves session tokens.
///
/// Requests without a token pass through unauthenticated; handlers that
/// need an identity reject them via [`require_auth`]. A token that is
/// present but unknown or expired fails the request here.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(token) = extract_token(&req) {
        let user = state.sessions.resolve(&token).await?;
        req.extensions_mut().insert(AuthenticatedUser { user, token });
    }

    Ok(next.run(req).await)
}

/// Require authentication (token must be present).
pub fn require_auth(req: &Request) -> ApiResult<&AuthenticatedUser> {
    req.extensions()
        .get::<AuthenticatedUser>()
        .ok_or(ApiError::Service(ServiceError::MissingToken))
}

/// Get optional authentication.
pub fn get_auth(req: &Request) -> Option<&AuthenticatedUser> {
    req.extensions().get::<AuthenticatedUser>()
}
