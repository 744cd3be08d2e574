//! HTTP middleware for throttling and observability.
//!
//! - **Rate Limiting**: fixed-window counter per client key, applied
//!   uniformly to every route; rejected requests never reach a handler
//! - **Request ID**: automatic generation and propagation for tracing
//!
//! # Architecture
//!
//! ```text
//! Request → CORS → Rate Limiter → Request ID → Trace → Handler → Response
//!                       ↓
//!                 429 Too Many Requests
//! ```
//!
//! CORS and trace layers come from tower-http and are wired in
//! [`crate::routes`]; this module holds the hand-rolled layers.

pub mod ip;
pub mod rate_limit;
pub mod request_id;

pub use ip::{UNKNOWN_CLIENT_KEY, extract_client_key};
pub use rate_limit::{Decision, FixedWindowLimiter, RateLimitLayer};
pub use request_id::RequestIdLayer;
