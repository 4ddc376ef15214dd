//! Application configuration loaded from environment variables.

use std::fmt;

use axum::http::HeaderValue;
use serde::Deserialize;

use crate::error::RelayError;

/// Application configuration loaded from environment variables.
#[derive(Clone, Deserialize)]
pub struct Config {
    // === LINE Credentials ===
    /// Channel access token used as the bearer credential for the Messaging API.
    pub line_channel_access_token: String,

    /// User, group or room id that receives visitor notifications.
    pub line_target_id: String,

    // === LINE API ===
    /// Messaging API base URL.
    #[serde(default = "default_api_base_url")]
    pub line_api_base_url: String,

    /// Outbound request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub line_http_timeout_ms: u64,

    // === Server Configuration ===
    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Single origin allowed to call the API from a browser. Any origin when unset.
    #[serde(default)]
    pub cors_allowed_origin: Option<String>,

    /// Expose Prometheus metrics at `/metrics`.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_api_base_url() -> String {
    "https://api.line.me".to_string()
}

fn default_http_timeout_ms() -> u64 {
    10_000
}

fn default_port() -> u16 {
    3000
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Load and validate in one step.
    pub fn from_env() -> crate::Result<Self> {
        let config = Self::load()?;
        config.validate().map_err(RelayError::InvalidConfig)?;
        Ok(config)
    }

    /// Build a config with defaults for everything but the two credentials.
    pub fn new(channel_access_token: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            line_channel_access_token: channel_access_token.into(),
            line_target_id: target_id.into(),
            line_api_base_url: default_api_base_url(),
            line_http_timeout_ms: default_http_timeout_ms(),
            port: default_port(),
            cors_allowed_origin: None,
            metrics_enabled: true,
        }
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.line_channel_access_token.trim().is_empty() {
            return Err("LINE_CHANNEL_ACCESS_TOKEN is required".to_string());
        }

        if self.line_target_id.trim().is_empty() {
            return Err("LINE_TARGET_ID is required".to_string());
        }

        let base = url::Url::parse(&self.line_api_base_url)
            .map_err(|e| format!("LINE_API_BASE_URL is not a valid URL: {}", e))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err("LINE_API_BASE_URL must use http or https".to_string());
        }

        if self.line_http_timeout_ms == 0 {
            return Err("LINE_HTTP_TIMEOUT_MS must be greater than 0".to_string());
        }

        if let Some(origin) = &self.cors_allowed_origin {
            if HeaderValue::from_str(origin).is_err() {
                return Err(format!("CORS_ALLOWED_ORIGIN is not a valid origin: {}", origin));
            }
        }

        Ok(())
    }

    /// Messaging API base URL without a trailing slash.
    pub fn api_base_url(&self) -> &str {
        self.line_api_base_url.trim_end_matches('/')
    }

    /// Outbound request timeout.
    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.line_http_timeout_ms)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("line_channel_access_token", &"<redacted>")
            .field("line_target_id", &self.line_target_id)
            .field("line_api_base_url", &self.line_api_base_url)
            .field("line_http_timeout_ms", &self.line_http_timeout_ms)
            .field("port", &self.port)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .field("metrics_enabled", &self.metrics_enabled)
            .finish()
    }
}
