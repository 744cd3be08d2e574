//! Request ID middleware for tracing and correlation.
//!
//! Incoming requests without an `X-Request-Id` header get a fresh UUIDv4;
//! an existing header is propagated unchanged. The ID is echoed on the
//! response so clients can correlate log lines with their calls.

use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::header::HeaderValue;
use axum::http::{Request, Response};
use tower::{Layer, Service};
use tracing::debug;
use uuid::Uuid;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Fallback header value when request ID parsing fails.
static UNKNOWN_REQUEST_ID: HeaderValue = HeaderValue::from_static("unknown");

/// Request ID layer for the Tower middleware stack.
#[derive(Clone, Default)]
pub struct RequestIdLayer;

impl RequestIdLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Request ID service wrapper.
#[derive(Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestIdService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let request_id = extract_or_generate_request_id(&req);

        // Visible to handlers through the request headers.
        req.headers_mut().insert(
            REQUEST_ID_HEADER,
            request_id
                .parse()
                .unwrap_or_else(|_| UNKNOWN_REQUEST_ID.clone()),
        );

        debug!(request_id = %request_id, "Processing request");

        let mut inner = self.inner.clone();

        Box::pin(async move {
            let mut response = inner.call(req).await?;

            response.headers_mut().insert(
                REQUEST_ID_HEADER,
                request_id
                    .parse()
                    .unwrap_or_else(|_| UNKNOWN_REQUEST_ID.clone()),
            );

            Ok(response)
        })
    }
}

/// Extract request ID from headers or generate a new one.
fn extract_or_generate_request_id<B>(req: &Request<B>) -> String {
    if let Some(header_value) = req.headers().get(REQUEST_ID_HEADER)
        && let Ok(value) = header_value.to_str()
        && !value.is_empty()
    {
        return value.to_string();
    }

    Uuid::new_v4().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_existing_request_id() {
        let req = Request::builder()
            .header("x-request-id", "existing-id-123")
            .body(Body::empty())
            .unwrap();

        assert_eq!(extract_or_generate_request_id(&req), "existing-id-123");
    }

    #[test]
    fn test_generate_new_request_id() {
        let req = Request::builder().body(Body::empty()).unwrap();

        let id = extract_or_generate_request_id(&req);

        // Should be a valid UUID
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
