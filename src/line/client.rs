//! LINE Messaging API client.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Serialize;
use tracing::{debug, error, instrument};

use crate::config::Config;
use crate::error::LineApiError;
use crate::metrics::{self, LatencyTimer};

use super::types::{clamp_text, PushRequest, ReplyRequest, ReplyToken, TextMessage};

const PUSH_PATH: &str = "/v2/bot/message/push";
const REPLY_PATH: &str = "/v2/bot/message/reply";

/// Characters of message text kept in failure logs.
const LOG_PREVIEW_CHARS: usize = 80;

/// LINE Messaging API client.
///
/// Cheap to clone; clones share the connection pool and the authorization
/// header built at construction.
#[derive(Debug, Clone)]
pub struct LineClient {
    /// HTTP client with the bearer token installed as a default header.
    http: reqwest::Client,
    /// Base URL for the Messaging API.
    base_url: String,
}

impl LineClient {
    /// Create a client from config.
    pub fn new(config: &Config) -> Result<Self, LineApiError> {
        let mut auth = HeaderValue::from_str(&format!(
            "Bearer {}",
            config.line_channel_access_token
        ))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.http_timeout())
            .connect_timeout(std::time::Duration::from_secs(5))
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url().to_string(),
        })
    }

    /// Get the Messaging API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Push a text message to a user, group or room id.
    #[instrument(skip(self, text))]
    pub async fn push(&self, to: &str, text: &str) -> Result<(), LineApiError> {
        let body = PushRequest {
            to,
            messages: vec![TextMessage::new(clamp_text(text))],
        };

        let result = self.post(PUSH_PATH, "push", &body).await;
        if let Err(e) = &result {
            error!(
                to = %to,
                status = ?e.status(),
                text = %preview(text),
                error = %e,
                "Failed to push LINE message"
            );
        }
        result
    }

    /// Reply to a webhook event. The token is consumed.
    #[instrument(skip_all)]
    pub async fn reply(&self, token: ReplyToken, text: &str) -> Result<(), LineApiError> {
        let body = ReplyRequest {
            reply_token: token.as_str(),
            messages: vec![TextMessage::new(clamp_text(text))],
        };

        let result = self.post(REPLY_PATH, "reply", &body).await;
        if let Err(e) = &result {
            error!(
                status = ?e.status(),
                text = %preview(text),
                error = %e,
                "Failed to send LINE reply"
            );
        }
        result
    }

    /// POST a JSON body and map the response to success or a captured failure.
    async fn post<T: Serialize>(
        &self,
        path: &str,
        kind: &'static str,
        body: &T,
    ) -> Result<(), LineApiError> {
        let url = format!("{}{}", self.base_url, path);

        let response = {
            let _timer = LatencyTimer::new(kind);
            self.http.post(&url).json(body).send().await
        };

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                metrics::record_line_call(kind, false);
                return Err(LineApiError::Request(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            metrics::record_line_call(kind, false);
            let body = response.text().await.unwrap_or_default();
            return Err(LineApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        metrics::record_line_call(kind, true);
        debug!(kind, status = %status, "LINE API accepted message");
        Ok(())
    }
}

/// Short single-line preview of message text for logs.
fn preview(text: &str) -> String {
    let flat = text.replace('\n', " ");
    let mut chars = flat.chars();
    let head: String = chars.by_ref().take(LOG_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
