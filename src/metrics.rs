//! Prometheus metrics for application observability.
//!
//! Metrics are exposed on a dedicated HTTP listener (default port 9090,
//! `METRICS_PORT=0` disables the exporter). Recording functions are no-ops
//! until the exporter is installed, so they are safe to call from tests.
//!
//! # Available Metrics
//!
//! ## Counters
//! - `clients_created_total` - Clients successfully created
//! - `clients_deleted_total` - Clients successfully deleted
//! - `requests_rate_limited_total` - Requests rejected by the throttle
//! - `store_failures_total` - Store faults surfaced as 500s (label: operation)

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{error, info};

/// Metric names as constants for consistency.
pub mod names {
    pub const CLIENTS_CREATED_TOTAL: &str = "clients_created_total";
    pub const CLIENTS_DELETED_TOTAL: &str = "clients_deleted_total";
    pub const REQUESTS_RATE_LIMITED_TOTAL: &str = "requests_rate_limited_total";
    pub const STORE_FAILURES_TOTAL: &str = "store_failures_total";
}

/// Initialize the Prometheus metrics exporter.
///
/// Sets up metric descriptions and starts the Prometheus HTTP listener on
/// the specified address.
///
/// # Errors
///
/// Returns an error message when the exporter cannot be installed (for
/// example, the port is already bound).
pub fn init_metrics(metrics_addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;

    describe_counter!(
        names::CLIENTS_CREATED_TOTAL,
        "Total number of clients created"
    );
    describe_counter!(
        names::CLIENTS_DELETED_TOTAL,
        "Total number of clients deleted"
    );
    describe_counter!(
        names::REQUESTS_RATE_LIMITED_TOTAL,
        "Total number of requests rejected by the rate limiter"
    );
    describe_counter!(
        names::STORE_FAILURES_TOTAL,
        "Total number of document store faults surfaced to callers"
    );

    info!(addr = %metrics_addr, "Prometheus metrics endpoint started");
    Ok(())
}

/// Try to initialize metrics, logging any errors but not failing.
///
/// Metrics are optional; the service runs fine without them.
pub fn try_init_metrics(metrics_addr: SocketAddr) {
    if let Err(e) = init_metrics(metrics_addr) {
        error!(error = %e, "Failed to initialize metrics, continuing without metrics");
    }
}

/// Record a successful client creation.
pub fn record_client_created() {
    counter!(names::CLIENTS_CREATED_TOTAL).increment(1);
}

/// Record a successful client deletion.
pub fn record_client_deleted() {
    counter!(names::CLIENTS_DELETED_TOTAL).increment(1);
}

/// Record a request rejected by the rate limiter.
pub fn record_rate_limited() {
    counter!(names::REQUESTS_RATE_LIMITED_TOTAL).increment(1);
}

/// Record a store fault surfaced as a 500.
pub fn record_store_failure(operation: &'static str) {
    counter!(names::STORE_FAILURES_TOTAL, "operation" => operation).increment(1);
}
