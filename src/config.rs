//! Application configuration loaded from environment variables.
//!
//! All configuration is loaded from environment variables with sensible
//! defaults for development. In production, configure via environment
//! variables or a `.env` file (loaded with dotenvy when present).
//!
//! # Throttling
//!
//! - `RATE_LIMIT_WINDOW_MS`: length of each fixed counting window
//!   (default: 900000 ms / 15 min)
//! - `RATE_LIMIT_MAX_REQUESTS`: request ceiling per window per client
//!   (default: 100; 0 disables throttling)
//! - `RATE_LIMIT_SWEEP_INTERVAL_SECS`: how often expired windows are
//!   evicted from memory (default: 60)
//!
//! # Store
//!
//! - `MONGODB_URI`, `MONGODB_DATABASE`, `MONGODB_COLLECTION`: where client
//!   records live. A connection failure at startup is fatal.

use std::env;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Server host address (default: "0.0.0.0")
    pub host: String,

    /// Server port (default: 3000)
    pub port: u16,

    // =========================================================================
    // Document Store Configuration
    // =========================================================================
    /// MongoDB connection string (default: "mongodb://localhost:27017")
    pub mongodb_uri: String,

    /// Database holding the client collection (default: "mydb")
    pub mongodb_database: String,

    /// Collection name for client records (default: "clients")
    pub mongodb_collection: String,

    // =========================================================================
    // Rate Limiting Configuration
    // =========================================================================
    /// Length of each fixed counting window (default: 15 minutes)
    pub rate_limit_window: Duration,

    /// Request ceiling per window per client key (default: 100)
    /// Set to 0 to disable rate limiting
    pub rate_limit_max_requests: u32,

    /// Interval between sweeps evicting expired window state (default: 60s)
    pub rate_limit_sweep_interval: Duration,

    // =========================================================================
    // Request Limits
    // =========================================================================
    /// Maximum request body size in bytes (default: 1MB)
    /// Prevents denial-of-service via large payloads
    pub max_request_body_size: usize,

    // =========================================================================
    // Observability Configuration
    // =========================================================================
    /// Port for Prometheus metrics endpoint (default: 9090, 0 = disabled)
    pub metrics_port: u16,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if any value is present but invalid
    /// (e.g., non-numeric PORT) or fails validation.
    pub fn from_env() -> AppResult<Self> {
        // Load an .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            // Server
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: Self::parse_env("PORT", 3000)?,

            // Document store
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongodb_database: env::var("MONGODB_DATABASE").unwrap_or_else(|_| "mydb".to_string()),
            mongodb_collection: env::var("MONGODB_COLLECTION")
                .unwrap_or_else(|_| "clients".to_string()),

            // Rate limiting
            rate_limit_window: Duration::from_millis(Self::parse_env(
                "RATE_LIMIT_WINDOW_MS",
                900_000,
            )?),
            rate_limit_max_requests: Self::parse_env("RATE_LIMIT_MAX_REQUESTS", 100)?,
            rate_limit_sweep_interval: Duration::from_secs(Self::parse_env(
                "RATE_LIMIT_SWEEP_INTERVAL_SECS",
                60,
            )?),

            // Request limits
            max_request_body_size: Self::parse_env("MAX_REQUEST_BODY_SIZE", 1024 * 1024)?, // 1MB

            // Observability
            metrics_port: Self::parse_env("METRICS_PORT", 9090)?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values for consistency and correctness.
    fn validate(&self) -> AppResult<()> {
        if self.rate_limiting_enabled() && self.rate_limit_window.is_zero() {
            return Err(AppError::Config(
                "RATE_LIMIT_WINDOW_MS must be greater than 0".to_string(),
            ));
        }

        if self.rate_limit_sweep_interval.is_zero() {
            return Err(AppError::Config(
                "RATE_LIMIT_SWEEP_INTERVAL_SECS must be greater than 0".to_string(),
            ));
        }

        if self.max_request_body_size == 0 {
            return Err(AppError::Config(
                "MAX_REQUEST_BODY_SIZE must be greater than 0".to_string(),
            ));
        }

        if self.mongodb_database.is_empty() || self.mongodb_collection.is_empty() {
            return Err(AppError::Config(
                "MONGODB_DATABASE and MONGODB_COLLECTION cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the full server address for binding.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if rate limiting is enabled.
    pub fn rate_limiting_enabled(&self) -> bool {
        self.rate_limit_max_requests > 0
    }

    /// Check if Prometheus metrics export is enabled.
    pub fn metrics_enabled(&self) -> bool {
        self.metrics_port > 0
    }

    /// Get the metrics endpoint address.
    ///
    /// Returns `None` if metrics are disabled (port = 0).
    pub fn metrics_addr(&self) -> Option<std::net::SocketAddr> {
        if self.metrics_enabled() {
            Some(std::net::SocketAddr::from((
                [0, 0, 0, 0],
                self.metrics_port,
            )))
        } else {
            None
        }
    }

    /// Parse an environment variable into the specified type with a default value.
    fn parse_env<T>(name: &str, default: T) -> AppResult<T>
    where
        T: std::str::FromStr + ToString,
        T::Err: std::fmt::Display,
    {
        match env::var(name) {
            Ok(val) => val
                .parse()
                .map_err(|e| AppError::Config(format!("Invalid {name}: {e}"))),
            Err(_) => Ok(default),
        }
    }
}

/// Default configuration for testing and development.
///
/// Production deployments should use `Config::from_env()` instead.
impl Default for Config {
    fn default() -> Self {
        Self {
            // Server
            host: "0.0.0.0".to_string(),
            port: 3000,
            // Document store
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            mongodb_database: "mydb".to_string(),
            mongodb_collection: "clients".to_string(),
            // Rate limiting
            rate_limit_window: Duration::from_millis(900_000), // 15 minutes
            rate_limit_max_requests: 100,
            rate_limit_sweep_interval: Duration::from_secs(60),
            // Request limits
            max_request_body_size: 1024 * 1024, // 1MB
            // Observability
            metrics_port: 9090,
        }
    }
}
