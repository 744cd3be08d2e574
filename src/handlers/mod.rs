mod clients;
mod health;

pub use clients::{create_client, delete_client, get_client, list_clients, update_client};
pub use health::{health_check, readiness_check};
