//! LINE Messaging API: outbound client, request payloads and webhook events.

pub mod client;
pub mod types;
pub mod webhook;

pub use client::LineClient;
pub use types::{ReplyToken, TextMessage};
pub use webhook::{EventSource, MessageContent, WebhookBatch, WebhookEvent};
