//! Client key extraction for per-client throttling.
//!
//! The rate limiter counts requests per originating address. Behind a
//! reverse proxy the peer address is the proxy, so proxy-set headers are
//! consulted first. These headers are client-controlled when the service is
//! exposed directly; deploy behind a proxy that overwrites them, or accept
//! that direct clients can shard themselves across keys.
//!
//! Requests with no identifiable address all share the [`UNKNOWN_CLIENT_KEY`]
//! bucket, so header-less traffic is still collectively throttled.

use std::borrow::Cow;

use axum::http::Request;

/// Fallback key when no client address can be determined.
pub const UNKNOWN_CLIENT_KEY: &str = "unknown";

/// Extract the throttling key for a request.
///
/// Checks in order (first match wins):
/// 1. `X-Forwarded-For` header (first address in the comma-separated list)
/// 2. `X-Real-IP` header
/// 3. Falls back to [`UNKNOWN_CLIENT_KEY`]
///
/// Returns `Cow<'static, str>`: borrowed for the fallback (no allocation),
/// owned for an actual address.
#[inline]
pub fn extract_client_key<B>(req: &Request<B>) -> Cow<'static, str> {
    // X-Forwarded-For carries "client, proxy1, proxy2"; the first entry is
    // the original client.
    if let Some(forwarded) = req.headers().get("x-forwarded-for")
        && let Ok(value) = forwarded.to_str()
        && let Some(first) = value.split(',').next()
    {
        return Cow::Owned(first.trim().to_string());
    }

    if let Some(real_ip) = req.headers().get("x-real-ip")
        && let Ok(value) = real_ip.to_str()
    {
        return Cow::Owned(value.trim().to_string());
    }

    Cow::Borrowed(UNKNOWN_CLIENT_KEY)
}
