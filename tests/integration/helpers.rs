//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;

use devicegate_api::{AppState, build_app};
use devicegate_auth::{MemorySessionStore, StoreHealth};
use devicegate_core::config::AppConfig;
use devicegate_core::types::DeviceLimit;

/// Secret shared between the test "identity provider" and the app.
pub const TEST_SECRET: &str = "integration-test-secret";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for poking at the store directly
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application with `max_devices = 3`
    pub fn new() -> Self {
        Self::with_max_devices(3)
    }

    /// Create a test application with a custom device limit
    pub fn with_max_devices(max_devices: u32) -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = TEST_SECRET.to_string();
        config.session.max_devices = DeviceLimit::new(max_devices).expect("valid limit");
        Self::with_config(config, StoreHealth::in_memory())
    }

    /// Create a test application around explicit config and store health
    pub fn with_config(config: AppConfig, health: StoreHealth) -> Self {
        let state = AppState::new(
            Arc::new(config),
            Arc::new(MemorySessionStore::new()),
            Arc::new(health),
        );
        let router = build_app(state.clone());
        Self { router, state }
    }

    /// Mint a token for `user_id` signed with the test secret
    pub fn token_for(&self, user_id: &str) -> String {
        let now = Utc::now().timestamp();
        encode(
            &Header::default(),
            &json!({ "sub": user_id, "iat": now, "exp": now + 3600, "email": "user@example.com" }),
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("Failed to mint token")
    }

    /// Admit `device_id` for `user_id` with a plain (non-forced) request
    pub async fn admit(&self, user_id: &str, device_id: &str) -> TestResponse {
        let token = self.token_for(user_id);
        self.request(
            "POST",
            "/api/devices/admit",
            Some(json!({
                "user_id": user_id,
                "device_id": device_id,
                "device_name": format!("{device_id} browser"),
            })),
            Some(&token),
        )
        .await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body (`Null` if not JSON)
    pub body: Value,
}

impl TestResponse {
    /// The `status` tag of an admission result
    pub fn admission_status(&self) -> &str {
        self.body["status"].as_str().unwrap_or_default()
    }

    /// Device ids of the `active_set` (admit) or `devices` (list) array
    pub fn device_ids(&self) -> Vec<String> {
        let list = if self.body["active_set"].is_array() {
            &self.body["active_set"]
        } else {
            &self.body["devices"]
        };
        list.as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|d| d["device_id"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Device ids flagged `is_current`
    pub fn current_ids(&self) -> Vec<String> {
        let list = if self.body["active_set"].is_array() {
            &self.body["active_set"]
        } else {
            &self.body["devices"]
        };
        list.as_array()
            .map(|items| {
                items
                    .iter()
                    .filter(|d| d["is_current"].as_bool() == Some(true))
                    .filter_map(|d| d["device_id"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
