mod api;
mod client;

pub use api::HealthResponse;
pub use client::Client;
