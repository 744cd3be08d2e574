//! End-to-end tests for the HTTP surface.
//!
//! Each test spins up the full router — middleware chain included — on an
//! ephemeral port, backed by the in-memory store, and drives it with
//! reqwest. The MongoDB-backed store has its own contract tests in
//! `mongo_store_tests.rs`.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use client_registry::store::MemoryClientStore;
use client_registry::{AppState, Config, build_router};

/// Test fixture running the application over a real TCP socket.
struct TestApp {
    base_url: String,
    client: reqwest::Client,
}

impl TestApp {
    /// Spawn the app with the given configuration.
    async fn spawn(config: Config) -> Self {
        let state = AppState::new(Arc::new(MemoryClientStore::new()), config);
        let app = build_router(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to ephemeral port");
        let addr = listener.local_addr().expect("Failed to get local address");

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                panic!("Test server error: {e}");
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
        }
    }

    /// Spawn with defaults suitable for CRUD tests: generous rate limit,
    /// metrics exporter off.
    async fn spawn_default() -> Self {
        Self::spawn(Config {
            metrics_port: 0,
            ..Config::default()
        })
        .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POST /clients with the given body, returning the parsed response.
    async fn create(&self, body: Value) -> (StatusCode, Value) {
        let response = self
            .client
            .post(self.url("/clients"))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status();
        let body = response.json().await.unwrap();
        (status, body)
    }
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_client_returns_201_with_record() {
    let app = TestApp::spawn_default().await;

    let (status, body) = app.create(json!({"name": "John Doe"})).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "John Doe");
    assert!(body["id"].is_string());
    assert!(!body["id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_without_name_returns_400() {
    let app = TestApp::spawn_default().await;

    let (status, body) = app.create(json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_create_with_empty_name_returns_400() {
    let app = TestApp::spawn_default().await;

    let (status, body) = app.create(json!({"name": ""})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_create_with_non_string_name_returns_400() {
    let app = TestApp::spawn_default().await;

    let (status, body) = app.create(json!({"name": 42})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("string"));
}

#[tokio::test]
async fn test_create_strips_unknown_fields() {
    let app = TestApp::spawn_default().await;

    let (status, body) = app
        .create(json!({"name": "John Doe", "role": "admin", "isAdmin": true}))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body.get("role").is_none());
    assert!(body.get("isAdmin").is_none());
}

// =============================================================================
// List / Get
// =============================================================================

#[tokio::test]
async fn test_list_on_empty_store_returns_empty_array() {
    let app = TestApp::spawn_default().await;

    let response = app.client.get(app.url("/clients")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/json"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_returns_all_clients_in_insertion_order() {
    let app = TestApp::spawn_default().await;
    app.create(json!({"name": "John Doe"})).await;
    app.create(json!({"name": "Jane Doe"})).await;

    let body: Value = app
        .client
        .get(app.url("/clients"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["John Doe", "Jane Doe"]);
}

#[tokio::test]
async fn test_get_returns_client_by_id() {
    let app = TestApp::spawn_default().await;
    let (_, created) = app.create(json!({"name": "John Doe"})).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .client
        .get(app.url(&format!("/clients/{id}")))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, created);
}

#[tokio::test]
async fn test_get_unknown_id_returns_404() {
    let app = TestApp::spawn_default().await;

    let response = app
        .client
        .get(app.url("/clients/123456789012345678901234"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Client not found");
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_changes_name() {
    let app = TestApp::spawn_default().await;
    let (_, created) = app.create(json!({"name": "John Doe"})).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .client
        .put(app.url(&format!("/clients/{id}")))
        .json(&json!({"name": "John Updated"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "John Updated");
    assert_eq!(body["id"], created["id"]);
}

#[tokio::test]
async fn test_update_ignores_fields_outside_allow_list() {
    let app = TestApp::spawn_default().await;
    let (_, created) = app.create(json!({"name": "John Doe"})).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .client
        .put(app.url(&format!("/clients/{id}")))
        .json(&json!({"name": "John Updated", "role": "admin"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "John Updated");
    assert!(body.get("role").is_none());

    // The persisted record is equally untouched by the unknown field.
    let fetched: Value = app
        .client
        .get(app.url(&format!("/clients/{id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(fetched.get("role").is_none());
}

#[tokio::test]
async fn test_update_unknown_id_returns_404() {
    let app = TestApp::spawn_default().await;

    let response = app
        .client
        .put(app.url("/clients/123456789012345678901234"))
        .json(&json!({"name": "John Updated"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Client not found");
}

#[tokio::test]
async fn test_update_with_empty_name_returns_400() {
    let app = TestApp::spawn_default().await;
    let (_, created) = app.create(json!({"name": "John Doe"})).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .client
        .put(app.url(&format!("/clients/{id}")))
        .json(&json!({"name": ""}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_then_get_returns_404() {
    let app = TestApp::spawn_default().await;
    let (_, created) = app.create(json!({"name": "John Doe"})).await;
    let id = created["id"].as_str().unwrap();

    let delete_response = app
        .client
        .delete(app.url(&format!("/clients/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(delete_response.status(), StatusCode::OK);
    let deleted: Value = delete_response.json().await.unwrap();
    assert_eq!(deleted["name"], "John Doe");

    // Deletion is observable through absence.
    let get_response = app
        .client
        .get(app.url(&format!("/clients/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(get_response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_id_returns_404() {
    let app = TestApp::spawn_default().await;

    let response = app
        .client
        .delete(app.url("/clients/123456789012345678901234"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Rate limiting
// =============================================================================

#[tokio::test]
async fn test_rate_limit_rejects_after_ceiling() {
    let app = TestApp::spawn(Config {
        rate_limit_max_requests: 3,
        rate_limit_window: Duration::from_secs(60),
        metrics_port: 0,
        ..Config::default()
    })
    .await;

    for _ in 0..3 {
        let response = app.client.get(app.url("/clients")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.client.get(app.url("/clients")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // Standard headers, no legacy X-RateLimit-* variants.
    assert_eq!(response.headers()["ratelimit-limit"], "3");
    assert_eq!(response.headers()["ratelimit-remaining"], "0");
    assert!(response.headers().contains_key("ratelimit-reset"));
    assert!(response.headers().contains_key("retry-after"));
    assert!(!response.headers().contains_key("x-ratelimit-limit"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Too many requests, please try again later.");
}

#[tokio::test]
async fn test_rate_limit_headers_on_allowed_responses() {
    let app = TestApp::spawn(Config {
        rate_limit_max_requests: 10,
        metrics_port: 0,
        ..Config::default()
    })
    .await;

    let response = app.client.get(app.url("/health")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["ratelimit-limit"], "10");
    assert_eq!(response.headers()["ratelimit-remaining"], "9");
}

#[tokio::test]
async fn test_rate_limit_budget_returns_after_window() {
    let app = TestApp::spawn(Config {
        rate_limit_max_requests: 2,
        rate_limit_window: Duration::from_millis(200),
        metrics_port: 0,
        ..Config::default()
    })
    .await;

    for _ in 0..2 {
        let response = app.client.get(app.url("/clients")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = app.client.get(app.url("/clients")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    tokio::time::sleep(Duration::from_millis(300)).await;

    let response = app.client.get(app.url("/clients")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_rate_limit_counts_per_client_key() {
    let app = TestApp::spawn(Config {
        rate_limit_max_requests: 1,
        metrics_port: 0,
        ..Config::default()
    })
    .await;

    let first = app
        .client
        .get(app.url("/clients"))
        .header("x-forwarded-for", "203.0.113.1")
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let throttled = app
        .client
        .get(app.url("/clients"))
        .header("x-forwarded-for", "203.0.113.1")
        .send()
        .await
        .unwrap();
    assert_eq!(throttled.status(), StatusCode::TOO_MANY_REQUESTS);

    // A different origin address still has its own budget.
    let other = app
        .client
        .get(app.url("/clients"))
        .header("x-forwarded-for", "203.0.113.2")
        .send()
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::OK);
}

// =============================================================================
// Cross-cutting
// =============================================================================

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = TestApp::spawn_default().await;

    let response = app
        .client
        .get(app.url("/clients"))
        .header("origin", "https://example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = TestApp::spawn_default().await;

    let response = app.client.get(app.url("/clients")).send().await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));

    let echoed = app
        .client
        .get(app.url("/clients"))
        .header("x-request-id", "my-correlation-id")
        .send()
        .await
        .unwrap();
    assert_eq!(echoed.headers()["x-request-id"], "my-correlation-id");
}

#[tokio::test]
async fn test_health_reports_store_status() {
    let app = TestApp::spawn_default().await;

    let response = app.client.get(app.url("/health")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store_connected"], true);
}

#[tokio::test]
async fn test_ready_returns_200_with_live_store() {
    let app = TestApp::spawn_default().await;

    let response = app.client.get(app.url("/ready")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
