//! Visitor notification routes against a stubbed LINE API.

mod common;

use axum::http::StatusCode;
use line_visitor_relay::api::{create_router, AppState};
use line_visitor_relay::Config;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{app_for, post_json, received_bodies, PUSH_PATH, TARGET_ID, TOKEN};

async fn mount_push(server: &MockServer, status: u16, body: Value, calls: u64) {
    Mock::given(method("POST"))
        .and(path(PUSH_PATH))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn valid_report_pushes_once_to_configured_target() {
    let server = MockServer::start().await;
    mount_push(&server, 200, json!({}), 1).await;

    let (status, body) = post_json(
        app_for(&server),
        "/notify-visitor",
        r#"{"ip":"1.2.3.4","userAgent":"Chrome","time":"2024-01-01T00:00:00Z"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({ "message": "Notification sent successfully!" }));

    let pushes = received_bodies(&server, PUSH_PATH).await;
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0]["to"], TARGET_ID);
    assert_eq!(pushes[0]["messages"][0]["type"], "text");
    let text = pushes[0]["messages"][0]["text"].as_str().unwrap();
    for value in ["1.2.3.4", "Chrome", "2024-01-01T00:00:00Z"] {
        assert!(text.contains(value), "missing {} in {}", value, text);
    }
}

#[tokio::test]
async fn log_visit_includes_browser_in_message() {
    let server = MockServer::start().await;
    mount_push(&server, 200, json!({}), 1).await;

    let (status, _) = post_json(
        app_for(&server),
        "/log-visit",
        r#"{"ip":"5.6.7.8","device":"Android","browser":"Firefox","time":"10:00"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let pushes = received_bodies(&server, PUSH_PATH).await;
    let text = pushes[0]["messages"][0]["text"].as_str().unwrap();
    for value in ["5.6.7.8", "Android", "Firefox", "10:00"] {
        assert!(text.contains(value), "missing {} in {}", value, text);
    }
}

#[tokio::test]
async fn missing_fields_return_400_without_outbound_call() {
    let server = MockServer::start().await;
    mount_push(&server, 200, json!({}), 0).await;

    let cases = [
        ("/notify-visitor", r#"{}"#),
        ("/notify-visitor", r#"{"userAgent":"Chrome","time":"t"}"#),
        ("/notify-visitor", r#"{"ip":"1.2.3.4","time":"t"}"#),
        ("/notify-visitor", r#"{"ip":"1.2.3.4","userAgent":"Chrome"}"#),
        ("/notify-visitor", r#"{"ip":"","userAgent":"Chrome","time":"t"}"#),
        ("/log-visit", r#"{"ip":"1.2.3.4","device":"Android","time":"t"}"#),
        ("/notify-visitor", r#"["not","an","object"]"#),
    ];

    for (uri, payload) in cases {
        let (status, _) = post_json(app_for(&server), uri, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", uri, payload);
    }

    assert!(received_bodies(&server, PUSH_PATH).await.is_empty());
}

#[tokio::test]
async fn missing_fields_are_named_in_response() {
    let server = MockServer::start().await;

    let (status, body) = post_json(app_for(&server), "/log-visit", r#"{"ip":"1.2.3.4"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["missing"], json!(["userAgent", "time", "browser"]));
    assert_eq!(body["error"], "Missing visitor data (userAgent, time, browser)");
}

#[tokio::test]
async fn upstream_failure_returns_500_with_detail() {
    let server = MockServer::start().await;
    mount_push(
        &server,
        400,
        json!({ "message": "The property, 'to', in the request body is invalid" }),
        1,
    )
    .await;

    let (status, body) = post_json(
        app_for(&server),
        "/notify-visitor",
        r#"{"ip":"1.2.3.4","userAgent":"Chrome","time":"2024-01-01T00:00:00Z"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"], "Failed to send LINE notification.");
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("400"), "{}", detail);
    assert!(detail.contains("in the request body is invalid"), "{}", detail);
}

#[tokio::test]
async fn unreachable_line_api_returns_500_with_detail() {
    let mut config = Config::new(TOKEN, TARGET_ID);
    // Nothing listens on the discard port.
    config.line_api_base_url = "http://127.0.0.1:9".to_string();
    config.line_http_timeout_ms = 2_000;
    let app = create_router(AppState::new(&config).unwrap());

    let (status, body) = post_json(
        app,
        "/notify-visitor",
        r#"{"ip":"1.2.3.4","userAgent":"Chrome","time":"2024-01-01T00:00:00Z"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"], "Failed to send LINE notification.");
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("request to LINE API failed"), "{}", detail);
}
