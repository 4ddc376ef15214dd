//! Shared helpers: a LINE API stub and a router pointed at it.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use line_visitor_relay::api::{create_router, AppState};
use line_visitor_relay::Config;
use serde_json::Value;
use tower::ServiceExt;
use wiremock::MockServer;

pub const TOKEN: &str = "test-channel-token";
pub const TARGET_ID: &str = "Uowner000000000000000000000000000";
pub const PUSH_PATH: &str = "/v2/bot/message/push";
pub const REPLY_PATH: &str = "/v2/bot/message/reply";

/// Config whose LINE API is the given stub.
pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::new(TOKEN, TARGET_ID);
    config.line_api_base_url = server.uri();
    config.line_http_timeout_ms = 2_000;
    config
}

/// Router wired to the stub.
pub fn app_for(server: &MockServer) -> Router {
    let state = AppState::new(&config_for(server)).expect("app state");
    create_router(state)
}

/// Send a POST with a JSON body and return status and body text.
pub async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// JSON bodies the stub received on a path, in arrival order.
pub async fn received_bodies(server: &MockServer, path: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == path)
        .map(|r| serde_json::from_slice(&r.body).expect("json body"))
        .collect()
}
