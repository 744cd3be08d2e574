use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Application-wide error types with appropriate HTTP status codes.
///
/// These are the typed outcomes the repository and handlers trade in.
/// There is no exception-style flow: a store fault is classified at the
/// repository boundary and carried up as a value until the router turns it
/// into a response.
#[derive(Error, Debug)]
pub enum AppError {
    /// Client-supplied data violates the resource schema.
    #[error("{0}")]
    Validation(String),

    /// The identifier does not resolve to a persisted record.
    #[error("{0}")]
    NotFound(String),

    /// The throttle ceiling was exceeded for this client.
    ///
    /// Produced by the rate-limiting middleware before a handler ever runs;
    /// the variant exists so the whole failure taxonomy lives in one enum.
    #[error("Too many requests, please try again later.")]
    RateLimited,

    /// Unclassified store or network fault.
    #[error("{0}")]
    Store(String),

    /// Configuration error (startup only).
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error response body for API endpoints.
///
/// Every failure, regardless of status code, is rendered as
/// `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            // The raw store message is surfaced in the 500 body. This leaks
            // internal detail to the caller; the tradeoff is documented in
            // DESIGN.md rather than silently hardened.
            AppError::Store(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        (status, axum::Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn response_parts(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn test_validation_maps_to_400() {
        let (status, body) = response_parts(AppError::Validation("name is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name is required");
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let (status, body) = response_parts(AppError::NotFound("Client not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Client not found");
    }

    #[tokio::test]
    async fn test_rate_limited_maps_to_429_with_fixed_message() {
        let (status, body) = response_parts(AppError::RateLimited).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"], "Too many requests, please try again later.");
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_500_with_raw_message() {
        let (status, body) =
            response_parts(AppError::Store("connection reset by peer".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "connection reset by peer");
    }
}
