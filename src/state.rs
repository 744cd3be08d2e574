//! Shared application state for Axum handlers.
//!
//! All components are wrapped in `Arc` or are internally shared, so the
//! state clones cheaply per request.
//!
//! # Structured Concurrency
//!
//! The rate-limiter sweep task is managed with
//! `tokio_util::task::TaskTracker` and `CancellationToken` for proper
//! lifecycle management. Call `shutdown()` to stop background tasks before
//! application exit.

use std::sync::Arc;
use std::time::Instant;

use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, trace};

use crate::config::Config;
use crate::middleware::FixedWindowLimiter;
use crate::repository::ClientRepository;
use crate::sanitize::SchemaPolicy;
use crate::store::ClientStore;

/// Shared application state for Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// CRUD operations over the document store.
    pub repository: ClientRepository,
    /// The store itself, for health/readiness probes.
    pub store: Arc<dyn ClientStore>,
    /// Request throttle shared between the middleware layer and the sweep
    /// task. `None` when rate limiting is disabled.
    pub limiter: Option<Arc<FixedWindowLimiter>>,
    /// Timestamp when the application started.
    pub started_at: Instant,
    /// Application configuration.
    pub config: Arc<Config>,
    /// Tracks spawned background tasks for graceful shutdown.
    task_tracker: TaskTracker,
    /// Cancellation token for signaling background tasks to stop.
    cancellation_token: CancellationToken,
}

impl AppState {
    /// Create application state from a store backend and configuration.
    ///
    /// When rate limiting is enabled this spawns the background task that
    /// periodically evicts expired throttle windows. Call `shutdown()` to
    /// terminate it gracefully.
    pub fn new(store: Arc<dyn ClientStore>, config: Config) -> Self {
        let repository = ClientRepository::new(Arc::clone(&store), SchemaPolicy::client());

        let limiter = config.rate_limiting_enabled().then(|| {
            Arc::new(FixedWindowLimiter::new(
                config.rate_limit_max_requests,
                config.rate_limit_window,
            ))
        });

        let state = Self {
            repository,
            store,
            limiter,
            started_at: Instant::now(),
            config: Arc::new(config),
            task_tracker: TaskTracker::new(),
            cancellation_token: CancellationToken::new(),
        };

        if state.limiter.is_some() {
            state.spawn_limiter_sweep_task();
        }

        state
    }

    /// Spawn the background task evicting expired rate-limit windows.
    ///
    /// Without the sweep, window state for one-off clients would accumulate
    /// for the lifetime of the process.
    fn spawn_limiter_sweep_task(&self) {
        let Some(limiter) = self.limiter.clone() else {
            return;
        };
        let sweep_interval = self.config.rate_limit_sweep_interval;
        let cancel = self.cancellation_token.clone();

        self.task_tracker.spawn(async move {
            let mut ticker = interval(sweep_interval);
            ticker.tick().await; // Skip the first immediate tick

            loop {
                tokio::select! {
                    biased; // Check cancellation first

                    _ = cancel.cancelled() => {
                        debug!("Rate-limit sweep task received cancellation signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        let evicted = limiter.sweep_expired();
                        if evicted > 0 {
                            trace!(evicted, tracked = limiter.tracked_keys(), "Swept expired rate-limit windows");
                        }
                    }
                }
            }

            debug!("Rate-limit sweep task shutting down");
        });
    }

    /// Gracefully shutdown all background tasks.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown of background tasks");

        self.cancellation_token.cancel();
        self.task_tracker.close();
        self.task_tracker.wait().await;

        info!("All background tasks have completed");
    }

    /// Get the application uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
