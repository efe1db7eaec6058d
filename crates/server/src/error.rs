//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cabinet_service::ServiceError;
use serde::Serialize;

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("metadata error: {0}")]
    Metadata(#[from] cabinet_metadata::MetadataError),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Metadata(_) => "metadata_error",
            Self::Service(e) => match e {
                ServiceError::MissingToken => "missing_token",
                ServiceError::Unauthorized => "unauthorized",
                ServiceError::InvalidCredentials => "invalid_credentials",
                ServiceError::MissingEmail => "missing_email",
                ServiceError::MissingPassword => "missing_password",
                ServiceError::MissingName => "missing_name",
                ServiceError::MissingType => "missing_type",
                ServiceError::MissingData => "missing_data",
                ServiceError::ParentNotFound(_) => "parent_not_found",
                ServiceError::ParentNotAFolder(_) => "parent_not_a_folder",
                ServiceError::NotFound(_) => "not_found",
                ServiceError::AlreadyExists(_) => "already_exists",
                ServiceError::FolderHasNoContent(_) => "folder_has_no_content",
                ServiceError::Metadata(_) => "metadata_error",
                ServiceError::Storage(_) => "storage_error",
                ServiceError::Session(_) => "session_error",
            },
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Metadata(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Service(e) => match e {
                ServiceError::MissingToken
                | ServiceError::Unauthorized
                | ServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                // Duplicate registration reports 400 rather than 409.
                ServiceError::MissingEmail
                | ServiceError::MissingPassword
                | ServiceError::MissingName
                | ServiceError::MissingType
                | ServiceError::MissingData
                | ServiceError::ParentNotFound(_)
                | ServiceError::ParentNotAFolder(_)
                | ServiceError::AlreadyExists(_)
                | ServiceError::FolderHasNoContent(_) => StatusCode::BAD_REQUEST,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::Metadata(_)
                | ServiceError::Storage(_)
                | ServiceError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_map_to_401() {
        for err in [
            ServiceError::MissingToken,
            ServiceError::Unauthorized,
            ServiceError::InvalidCredentials,
        ] {
            assert_eq!(ApiError::from(err).status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_validation_errors_map_to_400() {
        for err in [
            ServiceError::MissingName,
            ServiceError::MissingType,
            ServiceError::MissingData,
            ServiceError::ParentNotFound(7),
            ServiceError::ParentNotAFolder(7),
            ServiceError::AlreadyExists("user 'a@b'".to_string()),
            ServiceError::FolderHasNoContent(7),
        ] {
            assert_eq!(ApiError::from(err).status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::from(ServiceError::NotFound(42));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn test_codes_are_snake_case() {
        assert_eq!(ApiError::from(ServiceError::MissingToken).code(), "missing_token");
        assert_eq!(
            ApiError::from(ServiceError::ParentNotAFolder(1)).code(),
            "parent_not_a_folder"
        );
        assert_eq!(ApiError::BadRequest("x".to_string()).code(), "bad_request");
    }
}
