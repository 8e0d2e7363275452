//! API error type and its HTTP mapping.
//!
//! This is the single translation point from internal failures to
//! client-facing responses. Every failure body is `{"message": ...}`;
//! internal detail is logged, never serialized.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use bacprep_core::error::StoreError;

/// Error response body returned on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Short, human-readable description.
    pub message: String,
}

/// Failures a handler can produce.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request was well-formed JSON but semantically invalid.
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Credentials did not match.
    #[error("{0}")]
    Unauthorized(String),

    /// Anything else. The detail stays in the logs.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername(_) | StoreError::DuplicateEmail(_) => {
                ApiError::Validation(err.to_string())
            }
            StoreError::TaskNotFound { .. } => ApiError::NotFound(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            ApiError::Internal(error) => {
                tracing::error!(error = %format!("{error:#}"), "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_users_map_to_validation() {
        let err: ApiError = StoreError::DuplicateUsername("andrei".into()).into();
        assert!(matches!(err, ApiError::Validation(_)));

        let err: ApiError = StoreError::DuplicateEmail("a@b.c".into()).into();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn missing_task_maps_to_not_found() {
        let err: ApiError = StoreError::TaskNotFound {
            user_id: 1,
            task_id: 2,
        }
        .into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn internal_detail_is_not_in_the_message() {
        let err = ApiError::Internal(anyhow::anyhow!("connection string leaked"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
