//! LineClient request shape and error mapping against a stubbed LINE API.

mod common;

use line_visitor_relay::error::LineApiError;
use line_visitor_relay::line::{LineClient, ReplyToken};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{config_for, PUSH_PATH, REPLY_PATH, TOKEN};

#[tokio::test]
async fn push_sends_bearer_token_and_line_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PUSH_PATH))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "to": "U42",
            "messages": [{ "type": "text", "text": "hello" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = LineClient::new(&config_for(&server)).unwrap();
    client.push("U42", "hello").await.unwrap();
}

#[tokio::test]
async fn reply_sends_token_instead_of_recipient() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(REPLY_PATH))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .and(body_json(json!({
            "replyToken": "rt-1",
            "messages": [{ "type": "text", "text": "pong" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = LineClient::new(&config_for(&server)).unwrap();
    client.reply(ReplyToken::new("rt-1"), "pong").await.unwrap();
}

#[tokio::test]
async fn non_success_status_carries_upstream_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(REPLY_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Invalid reply token" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = LineClient::new(&config_for(&server)).unwrap();
    let err = client
        .reply(ReplyToken::new("stale"), "too late")
        .await
        .unwrap_err();

    match err {
        LineApiError::Status { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("Invalid reply token"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn unauthorized_is_reported_not_panicked() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PUSH_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = LineClient::new(&config_for(&server)).unwrap();
    let err = client.push("U1", "x").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}
