//! Fixed-window request throttling.
//!
//! # Algorithm
//!
//! Each client key owns a counting window: a start instant and a request
//! count. A request admitted when no window exists, or after the window
//! length has elapsed, starts a fresh window. The count is incremented and
//! compared against the ceiling; past the ceiling, the request is rejected
//! until the window expires.
//!
//! Fixed windows over-admit around a boundary: a client can spend a full
//! budget at the end of one window and another at the start of the next,
//! up to twice the ceiling in a short burst. That imprecision is part of
//! the contract here, not a bug.
//!
//! # Response Headers
//!
//! Draft-RFC style headers on every throttled route response:
//!
//! - `RateLimit-Limit`: configured ceiling per window
//! - `RateLimit-Remaining`: requests left in the current window
//! - `RateLimit-Reset`: seconds until the window resets
//!
//! On 429, `Retry-After` is set as well. Legacy `X-RateLimit-*` headers are
//! not emitted.
//!
//! # Concurrency
//!
//! Window state lives in a `DashMap`; the read-modify-write in [`admit`]
//! happens while holding the map entry, so concurrent requests for the same
//! key never lose increments. Expired entries are evicted by
//! [`FixedWindowLimiter::sweep_expired`], driven from a background task.
//!
//! [`admit`]: FixedWindowLimiter::admit

use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, Request, Response};
use axum::response::IntoResponse;
use dashmap::DashMap;
use tower::{Layer, Service};
use tracing::warn;

use super::ip::extract_client_key;
use crate::error::AppError;
use crate::metrics;

/// `RateLimit-Limit` response header.
pub const LIMIT_HEADER: &str = "ratelimit-limit";
/// `RateLimit-Remaining` response header.
pub const REMAINING_HEADER: &str = "ratelimit-remaining";
/// `RateLimit-Reset` response header.
pub const RESET_HEADER: &str = "ratelimit-reset";
/// `Retry-After` response header, set on 429 only.
pub const RETRY_AFTER_HEADER: &str = "retry-after";

/// Per-key window state.
#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The request may proceed.
    Allowed {
        /// Requests left in the current window.
        remaining: u32,
        /// Time until the current window resets.
        reset_after: Duration,
    },
    /// The ceiling is exhausted; the pipeline must short-circuit.
    Rejected {
        /// Time until the current window resets.
        retry_after: Duration,
    },
}

/// Process-wide fixed-window counter keyed by client.
///
/// State is process-local. Running several instances behind one address
/// multiplies the effective ceiling by the instance count; that limitation
/// is accepted and documented rather than coordinated away.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    windows: DashMap<String, Window>,
}

impl FixedWindowLimiter {
    /// Create a limiter admitting `max_requests` per `window` per key.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: DashMap::new(),
        }
    }

    /// The configured per-window ceiling.
    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Check and count a request for `key` against the current time.
    pub fn admit(&self, key: &str) -> Decision {
        self.admit_at(key, Instant::now())
    }

    /// Check and count a request for `key` as of `now`.
    ///
    /// Requests from one key are counted in arrival order: the entry lock
    /// serializes the read-modify-write below.
    pub fn admit_at(&self, key: &str, now: Instant) -> Decision {
        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert(Window {
                started_at: now,
                count: 0,
            });
        let window = entry.value_mut();

        if now.duration_since(window.started_at) >= self.window {
            window.started_at = now;
            window.count = 0;
        }

        // The count keeps climbing past the ceiling while rejected; it is
        // reset only by window expiry.
        window.count = window.count.saturating_add(1);

        let elapsed = now.duration_since(window.started_at);
        let reset_after = self.window.saturating_sub(elapsed);

        if window.count > self.max_requests {
            Decision::Rejected {
                retry_after: reset_after,
            }
        } else {
            Decision::Allowed {
                remaining: self.max_requests - window.count,
                reset_after,
            }
        }
    }

    /// Evict windows that have expired. Returns the number removed.
    pub fn sweep_expired(&self) -> usize {
        let before = self.windows.len();
        let window_len = self.window;
        self.windows
            .retain(|_, w| w.started_at.elapsed() < window_len);
        before.saturating_sub(self.windows.len())
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

/// Throttling layer for the Tower middleware stack.
///
/// Applied uniformly to every route; a rejected request is answered with
/// 429 and the fixed message without ever reaching the router.
#[derive(Clone)]
pub struct RateLimitLayer {
    limiter: Arc<FixedWindowLimiter>,
}

impl RateLimitLayer {
    pub fn new(limiter: Arc<FixedWindowLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            limiter: self.limiter.clone(),
        }
    }
}

/// Throttling service wrapper.
#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    limiter: Arc<FixedWindowLimiter>,
}

impl<S> Service<Request<Body>> for RateLimitService<S>
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

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let limiter = self.limiter.clone();
        let mut inner = self.inner.clone();

        // Owned key: the admission check and response outlive the request
        // reference.
        let client_key = extract_client_key(&req).into_owned();

        Box::pin(async move {
            match limiter.admit(&client_key) {
                Decision::Allowed {
                    remaining,
                    reset_after,
                } => {
                    let mut response = inner.call(req).await?;
                    apply_headers(
                        response.headers_mut(),
                        limiter.max_requests(),
                        remaining,
                        reset_after,
                    );
                    Ok(response)
                }
                Decision::Rejected { retry_after } => {
                    let retry_secs = retry_after.as_secs().max(1);
                    warn!(
                        client_key = %client_key,
                        path = %req.uri().path(),
                        retry_after_secs = retry_secs,
                        "Rate limit exceeded"
                    );
                    metrics::record_rate_limited();

                    let mut response = AppError::RateLimited.into_response();
                    apply_headers(
                        response.headers_mut(),
                        limiter.max_requests(),
                        0,
                        retry_after,
                    );
                    response
                        .headers_mut()
                        .insert(RETRY_AFTER_HEADER, HeaderValue::from(retry_secs));
                    Ok(response)
                }
            }
        })
    }
}

fn apply_headers(headers: &mut HeaderMap, limit: u32, remaining: u32, reset_after: Duration) {
    headers.insert(LIMIT_HEADER, HeaderValue::from(limit));
    headers.insert(REMAINING_HEADER, HeaderValue::from(remaining));
    headers.insert(RESET_HEADER, HeaderValue::from(reset_after.as_secs()));
}
