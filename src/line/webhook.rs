//! Webhook payloads delivered by the LINE platform.
//!
//! LINE posts `{"destination": "...", "events": [...]}`. Events are decoded one
//! at a time so that one malformed or unexpected record does not make the whole
//! batch unreadable.

use serde::Deserialize;

use crate::error::WebhookError;

use super::types::ReplyToken;

/// Webhook request body.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookBatch {
    /// Bot user id the events are addressed to.
    #[serde(default)]
    pub destination: Option<String>,
    /// Raw event records, decoded lazily by [`WebhookBatch::into_events`].
    #[serde(default)]
    events: Option<Vec<serde_json::Value>>,
}

impl WebhookBatch {
    /// Parse a request body. An empty body is an empty batch.
    pub fn parse(body: &[u8]) -> Result<Self, WebhookError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(body)?)
    }

    /// Number of event records in the batch.
    pub fn len(&self) -> usize {
        self.events.as_ref().map_or(0, Vec::len)
    }

    /// True when the batch carries no events.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode each record, in delivery order.
    pub fn into_events(self) -> impl Iterator<Item = Result<WebhookEvent, WebhookError>> {
        self.events
            .unwrap_or_default()
            .into_iter()
            .map(WebhookEvent::from_value)
    }
}

/// Where an event came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    /// `user`, `group` or `room`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Sending user. Absent for group members who have not consented.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Group id for group sources.
    #[serde(default)]
    pub group_id: Option<String>,
    /// Room id for room sources.
    #[serde(default)]
    pub room_id: Option<String>,
}

/// Content of a `message` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// Plain text message.
    Text(String),
    /// Sticker, image, location and the rest; carries the LINE type name.
    Other(String),
}

/// A decoded webhook event.
#[derive(Debug)]
pub enum WebhookEvent {
    /// A user sent the bot a message.
    Message {
        /// Sender.
        source: EventSource,
        /// Token for a single reply.
        reply_token: ReplyToken,
        /// Message content.
        message: MessageContent,
    },
    /// A user added the bot as a friend or unblocked it.
    Follow {
        /// New follower.
        source: EventSource,
    },
    /// A user blocked the bot.
    Unfollow {
        /// Former follower.
        source: EventSource,
    },
    /// Any event type the relay does not act on.
    Other {
        /// LINE event type name.
        kind: String,
        /// Event source, when present.
        source: EventSource,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    reply_token: Option<ReplyToken>,
    #[serde(default)]
    source: Option<EventSource>,
    #[serde(default)]
    message: Option<RawMessage>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl WebhookEvent {
    /// Decode one event record.
    pub fn from_value(value: serde_json::Value) -> Result<Self, WebhookError> {
        let raw: RawEvent = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    /// LINE event type name.
    pub fn kind(&self) -> &str {
        match self {
            Self::Message { .. } => "message",
            Self::Follow { .. } => "follow",
            Self::Unfollow { .. } => "unfollow",
            Self::Other { kind, .. } => kind,
        }
    }

    /// Metric label for this event. Unlike [`kind`](Self::kind) this never
    /// carries the sender's type string, so the label set stays fixed.
    pub fn metric_kind(&self) -> &'static str {
        match self {
            Self::Message { .. } => "message",
            Self::Follow { .. } => "follow",
            Self::Unfollow { .. } => "unfollow",
            Self::Other { .. } => "other",
        }
    }

    /// Event source.
    pub fn source(&self) -> &EventSource {
        match self {
            Self::Message { source, .. }
            | Self::Follow { source }
            | Self::Unfollow { source }
            | Self::Other { source, .. } => source,
        }
    }

    /// Sending user id, if LINE included one.
    pub fn source_user_id(&self) -> Option<&str> {
        self.source().user_id.as_deref()
    }

    fn from_raw(raw: RawEvent) -> Result<Self, WebhookError> {
        let source = raw.source.unwrap_or_default();

        let event = match raw.kind.as_str() {
            "message" => {
                let missing = |field: &'static str| WebhookError::MissingField {
                    kind: raw.kind.clone(),
                    field,
                };
                let reply_token = raw.reply_token.ok_or_else(|| missing("replyToken"))?;
                let message = raw.message.ok_or_else(|| missing("message"))?;
                let message = if message.kind == "text" {
                    MessageContent::Text(message.text.ok_or_else(|| missing("message.text"))?)
                } else {
                    MessageContent::Other(message.kind)
                };
                Self::Message {
                    source,
                    reply_token,
                    message,
                }
            }
            "follow" => Self::Follow { source },
            "unfollow" => Self::Unfollow { source },
            other => Self::Other {
                kind: other.to_string(),
                source,
            },
        };

        Ok(event)
    }
}
