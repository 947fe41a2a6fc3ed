//! Firestore error types.

use thiserror::Error;

/// Result type for Firestore operations.
pub type FirestoreResult<T> = Result<T, FirestoreError>;

/// Errors that can occur during Firestore operations.
#[derive(Debug, Error)]
pub enum FirestoreError {
    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Document already exists: {0}")]
    AlreadyExists(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited, retry after {0}ms")]
    RateLimited(u64),

    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FirestoreError {
    pub fn auth_error(msg: impl Into<String>) -> Self {
        Self::AuthError(msg.into())
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Map an HTTP status from the REST API onto an error variant.
    pub fn from_http_status(status: u16, msg: impl Into<String>) -> Self {
        match status {
            404 => Self::NotFound(msg.into()),
            409 => Self::AlreadyExists(msg.into()),
            429 => Self::RateLimited(1000),
            500..=599 => Self::ServerError(status, msg.into()),
            _ => Self::RequestFailed(msg.into()),
        }
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FirestoreError::Network(_)
                | FirestoreError::RateLimited(_)
                | FirestoreError::ServerError(_, _)
        )
    }

    /// HTTP status this error corresponds to, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            FirestoreError::NotFound(_) => Some(404),
            FirestoreError::AlreadyExists(_) => Some(409),
            FirestoreError::RateLimited(_) => Some(429),
            FirestoreError::ServerError(status, _) => Some(*status),
            _ => None,
        }
    }

    /// Server-requested retry delay, if any.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            FirestoreError::RateLimited(ms) => Some(*ms),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status_404() {
        let err = FirestoreError::from_http_status(404, "missing");
        assert!(matches!(err, FirestoreError::NotFound(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_from_http_status_429() {
        let err = FirestoreError::from_http_status(429, "slow down");
        assert!(matches!(err, FirestoreError::RateLimited(_)));
        assert!(err.is_retryable());
        assert_eq!(err.retry_after_ms(), Some(1000));
    }

    #[test]
    fn test_from_http_status_5xx() {
        let err = FirestoreError::from_http_status(503, "unavailable");
        assert!(matches!(err, FirestoreError::ServerError(503, _)));
        assert!(err.is_retryable());
        assert_eq!(err.http_status(), Some(503));
    }

    #[test]
    fn test_from_http_status_4xx() {
        let err = FirestoreError::from_http_status(400, "bad request");
        assert!(matches!(err, FirestoreError::RequestFailed(_)));
        assert!(!err.is_retryable());
    }
}
