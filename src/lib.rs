//! # Client Registry
//!
//! A minimal CRUD API for a client registry, backed by MongoDB and fronted
//! by a throttling middleware chain:
//!
//! - **Single resource**: `Client { id, name }`, with `name` required
//! - **Field allow-listing**: unknown payload fields are stripped before
//!   they reach persistence
//! - **Throttling**: fixed-window request counting per client address,
//!   with standard rate-limit response headers
//! - **Typed outcomes**: repository results map deterministically to
//!   HTTP status codes
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum HTTP Server                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Middleware (CORS → Rate Limit → Request ID → Trace)        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Handlers (clients, health)                                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ClientRepository (sanitize → validate → typed outcomes)    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ClientStore trait (MongoDB / in-memory)                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use client_registry::store::MongoClientStore;
//! use client_registry::{AppState, Config, build_router};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let store = MongoClientStore::connect(&config).await?;
//!
//!     let state = AppState::new(Arc::new(store), config);
//!     let app = build_router(state);
//!
//!     // Start the server...
//!     Ok(())
//! }
//! ```
//!
//! ## Throttling Configuration
//!
//! ```bash
//! RATE_LIMIT_WINDOW_MS=900000 RATE_LIMIT_MAX_REQUESTS=100 cargo run
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod sanitize;
pub mod state;
pub mod store;
pub mod utils;
pub mod validation;

// Re-exports for convenience
pub use config::Config;
pub use error::{AppError, AppResult};
pub use repository::ClientRepository;
pub use routes::build_router;
pub use sanitize::SchemaPolicy;
pub use state::AppState;
