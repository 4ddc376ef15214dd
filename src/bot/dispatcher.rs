//! Webhook event dispatch.
//!
//! Each event is turned into an [`Action`] without touching the network, then
//! the action is executed against the LINE API. Events are handled one after
//! another in delivery order; a failed send is logged and the next event still
//! runs.

use tracing::{debug, info, warn};

use crate::line::{LineClient, MessageContent, ReplyToken, WebhookBatch, WebhookEvent};
use crate::metrics;

use super::commands::{respond_to, WELCOME_MESSAGE};

/// What to do for one event.
#[derive(Debug)]
pub enum Action {
    /// Answer through the event's reply token.
    Reply {
        /// Token from the event.
        token: ReplyToken,
        /// Reply text.
        text: String,
    },
    /// Push to a user id.
    Push {
        /// Recipient.
        to: String,
        /// Message text.
        text: String,
    },
    /// Nothing to send.
    Ignore {
        /// Why the event needs no message.
        reason: &'static str,
    },
}

/// Decide how to handle an event.
pub fn plan(event: WebhookEvent) -> Action {
    match event {
        WebhookEvent::Message {
            reply_token,
            message: MessageContent::Text(text),
            ..
        } => Action::Reply {
            token: reply_token,
            text: respond_to(&text),
        },
        WebhookEvent::Message {
            message: MessageContent::Other(_),
            ..
        } => Action::Ignore {
            reason: "non-text message",
        },
        WebhookEvent::Follow { source } => match source.user_id {
            Some(to) => Action::Push {
                to,
                text: WELCOME_MESSAGE.to_string(),
            },
            None => Action::Ignore {
                reason: "follow event without user id",
            },
        },
        // Nothing is stored per follower, so there is nothing to clean up.
        WebhookEvent::Unfollow { .. } => Action::Ignore { reason: "unfollow" },
        WebhookEvent::Other { .. } => Action::Ignore {
            reason: "unhandled event type",
        },
    }
}

/// Counts of what happened to a webhook batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Events in the batch.
    pub received: usize,
    /// Replies LINE accepted.
    pub replied: usize,
    /// Pushes LINE accepted.
    pub pushed: usize,
    /// Events that needed no message.
    pub ignored: usize,
    /// Malformed events and failed sends.
    pub failed: usize,
}

/// Dispatch every event in a batch, in order.
pub async fn dispatch(client: &LineClient, batch: WebhookBatch) -> DispatchSummary {
    let mut summary = DispatchSummary {
        received: batch.len(),
        ..Default::default()
    };

    for (index, event) in batch.into_events().enumerate() {
        let event = match event {
            Ok(event) => event,
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed webhook event");
                metrics::record_webhook_event("malformed");
                summary.failed += 1;
                continue;
            }
        };

        let kind = event.kind().to_string();
        let user_id = event.source_user_id().map(str::to_string);
        metrics::record_webhook_event(event.metric_kind());
        debug!(index, kind = %kind, user_id = ?user_id, "Handling webhook event");

        match plan(event) {
            Action::Reply { token, text } => match client.reply(token, &text).await {
                Ok(()) => summary.replied += 1,
                Err(e) => {
                    warn!(index, kind = %kind, user_id = ?user_id, error = %e, "Reply failed");
                    summary.failed += 1;
                }
            },
            Action::Push { to, text } => match client.push(&to, &text).await {
                Ok(()) => summary.pushed += 1,
                Err(e) => {
                    warn!(index, kind = %kind, to = %to, error = %e, "Push failed");
                    summary.failed += 1;
                }
            },
            Action::Ignore { reason } => {
                info!(index, kind = %kind, user_id = ?user_id, reason, "No message sent for event");
                summary.ignored += 1;
            }
        }
    }

    summary
}
