use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failure taxonomy for the whole HTTP surface. Authentication failures keep
/// the exact messages the clients already match on.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required. Please provide a valid Bearer token.")]
    AuthenticationRequired,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Account is disabled")]
    AccountDisabled,
    #[error("Empty token provided")]
    EmptyToken,
    #[error("Invalid token encoding")]
    InvalidEncoding,
    #[error("Invalid token structure")]
    InvalidStructure,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Invalid token signature")]
    InvalidSignature,
    #[error("User not found")]
    UserNotFound,
    #[error("Access denied")]
    Forbidden,
    #[error("{0}")]
    Validation(String),
    #[error("Email already registered")]
    EmailTaken,
    #[error("User not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::AuthenticationRequired
            | ApiError::InvalidCredentials
            | ApiError::AccountDisabled
            | ApiError::EmptyToken
            | ApiError::InvalidEncoding
            | ApiError::InvalidStructure
            | ApiError::TokenExpired
            | ApiError::InvalidSignature
            | ApiError::UserNotFound => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::EmailTaken => StatusCode::CONFLICT,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_map_to_401() {
        for err in [
            ApiError::AuthenticationRequired,
            ApiError::InvalidCredentials,
            ApiError::AccountDisabled,
            ApiError::EmptyToken,
            ApiError::InvalidEncoding,
            ApiError::InvalidStructure,
            ApiError::TokenExpired,
            ApiError::InvalidSignature,
            ApiError::UserNotFound,
        ] {
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn denial_maps_to_403_with_uniform_message() {
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::Forbidden.to_string(), "Access denied");
    }

    #[test]
    fn validation_failures_are_recoverable_statuses() {
        assert_eq!(
            ApiError::Validation("Password too short".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::EmailTaken.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = ApiError::Internal(anyhow::anyhow!("pool timed out"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
