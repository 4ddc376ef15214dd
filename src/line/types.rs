//! Request payloads for the LINE Messaging API.

use serde::{Deserialize, Serialize};

/// Maximum number of characters LINE accepts in a single text message.
pub const MAX_TEXT_LENGTH: usize = 5000;

/// A single text message object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextMessage<'a> {
    /// Message type, always `"text"`.
    #[serde(rename = "type")]
    pub message_type: &'static str,
    /// Message body.
    pub text: &'a str,
}

impl<'a> TextMessage<'a> {
    /// Create a text message.
    pub fn new(text: &'a str) -> Self {
        Self {
            message_type: "text",
            text,
        }
    }
}

/// Body of `POST /v2/bot/message/push`.
#[derive(Debug, Serialize)]
pub struct PushRequest<'a> {
    /// Recipient user, group or room id.
    pub to: &'a str,
    /// Messages to deliver.
    pub messages: Vec<TextMessage<'a>>,
}

/// Body of `POST /v2/bot/message/reply`.
#[derive(Debug, Serialize)]
pub struct ReplyRequest<'a> {
    /// Reply token taken from a webhook event.
    #[serde(rename = "replyToken")]
    pub reply_token: &'a str,
    /// Messages to deliver.
    pub messages: Vec<TextMessage<'a>>,
}

/// Single-use token issued with a webhook event.
///
/// LINE accepts a token once and only for about 30 seconds after the event was
/// sent. The type is deliberately not `Clone`: [`LineClient::reply`] takes it by
/// value, so a token can be spent at most once.
///
/// [`LineClient::reply`]: super::LineClient::reply
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ReplyToken(String);

impl ReplyToken {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Truncate text to what LINE accepts, on a char boundary.
pub fn clamp_text(text: &str) -> &str {
    match text.char_indices().nth(MAX_TEXT_LENGTH) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
