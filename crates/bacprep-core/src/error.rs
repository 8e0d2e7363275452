//! Error types for the store and the text-generation service.
//!
//! Defined in `bacprep-core` so callers can downcast and classify failures
//! without string matching.

use thiserror::Error;

/// Errors raised by [`crate::store::StudyStore`] operations.
///
/// Lookups that can legitimately come up empty return `Option` instead; these
/// variants cover the few operations that fail hard.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A user with this username already exists.
    #[error("username already taken: {0}")]
    DuplicateUsername(String),

    /// A user with this email already exists.
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    /// No study-plan task with this id belongs to this user.
    #[error("task {task_id} not found for user {user_id}")]
    TaskNotFound { user_id: u32, task_id: u32 },
}

/// Errors that can occur when calling the external text-generation service.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid or missing API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The service replied, but the reply could not be parsed into the
    /// expected shape.
    #[error("malformed reply from model: {0}")]
    MalformedReply(String),
}

impl ModelError {
    /// Returns `true` if this error is permanent and retrying is pointless.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ModelError::AuthenticationFailed(_) | ModelError::MalformedReply(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_messages() {
        let err = StoreError::TaskNotFound {
            user_id: 1,
            task_id: 9,
        };
        assert_eq!(err.to_string(), "task 9 not found for user 1");

        let err = StoreError::DuplicateUsername("andrei".into());
        assert!(err.to_string().contains("andrei"));
    }

    #[test]
    fn permanent_classification() {
        assert!(ModelError::AuthenticationFailed("bad key".into()).is_permanent());
        assert!(ModelError::MalformedReply("not json".into()).is_permanent());
        assert!(!ModelError::RateLimited { retry_after_ms: 5000 }.is_permanent());
        assert!(!ModelError::Timeout(120).is_permanent());
    }
}
