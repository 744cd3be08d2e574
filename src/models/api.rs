use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service health status ("healthy" or "degraded").
    pub status: String,
    /// Whether the document store answered a ping.
    pub store_connected: bool,
    /// Service version.
    pub version: String,
    /// Time the check was performed.
    pub timestamp: DateTime<Utc>,
}
