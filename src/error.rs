// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
///
/// Authentication and validation failures become 4xx responses with a
/// client-facing message; anything unexpected is logged and becomes a
/// generic 500 so internals never leak to the client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No session cookie on a protected route.
    #[error("Unauthorized - No token provided")]
    Unauthenticated,

    /// Session token is malformed, expired, or signed with the wrong key.
    #[error("Unauthorized - Invalid token")]
    InvalidCredential,

    /// Session token is valid but its user no longer exists.
    #[error("Unauthorized - User not found")]
    UnknownUser,

    /// Bad login credentials (same message for unknown email and bad password).
    #[error("Invalid email or password")]
    InvalidLogin,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// State-machine transition attempted on a document in the wrong state.
    #[error("{0}")]
    InvalidState(String),

    #[error("Chat provider error: {0}")]
    Provider(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated
            | AppError::InvalidCredential
            | AppError::UnknownUser
            | AppError::InvalidLogin => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::Provider(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Internal server error");
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_map_to_401() {
        assert_eq!(AppError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::InvalidCredential.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::UnknownUser.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidLogin.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_server_faults_map_to_500() {
        assert_eq!(
            AppError::Provider("signing failed".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Database("offline".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_state_is_conflict() {
        assert_eq!(
            AppError::InvalidState("already accepted".into()).status(),
            StatusCode::CONFLICT
        );
    }
}
