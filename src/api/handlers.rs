//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::bot;
use crate::config::Config;
use crate::error::LineApiError;
use crate::line::{LineClient, WebhookBatch};
use crate::metrics;
use crate::visitor::{Requirement, VisitorReport};

use super::error::ApiError;

/// Body of `GET /`.
pub const ROOT_MESSAGE: &str =
    "LINE Visitor Notifier Server is running. Send POST requests to /notify-visitor.";

/// Body of every webhook response.
pub const WEBHOOK_ACK: &str = "Event received and processed.";

/// Body of a successful visitor notification.
pub const NOTIFY_SUCCESS: &str = "Notification sent successfully!";

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// LINE Messaging API client.
    pub line: LineClient,
    /// Recipient of visitor notifications.
    pub target_id: Arc<str>,
    /// Origin allowed by CORS; any when unset.
    pub cors_allowed_origin: Option<String>,
    /// Prometheus handle, when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create app state from validated config.
    pub fn new(config: &Config) -> Result<Self, LineApiError> {
        Ok(Self {
            line: LineClient::new(config)?,
            target_id: Arc::from(config.line_target_id.as_str()),
            cors_allowed_origin: config.cors_allowed_origin.clone(),
            metrics: None,
        })
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Successful visitor notification response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Confirmation text.
    pub message: &'static str,
}

/// Root handler - static description of the service.
pub async fn root() -> &'static str {
    ROOT_MESSAGE
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Prometheus scrape endpoint.
pub async fn prometheus(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics are disabled".to_string(),
        ),
    }
}

/// `POST /notify-visitor` - `browser` optional.
pub async fn notify_visitor(
    State(state): State<AppState>,
    payload: Result<Json<VisitorReport>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    send_visit(&state, payload, Requirement::Basic).await
}

/// `POST /log-visit` - `browser` required.
pub async fn log_visit(
    State(state): State<AppState>,
    payload: Result<Json<VisitorReport>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    send_visit(&state, payload, Requirement::WithBrowser).await
}

#[instrument(skip_all, fields(requirement = ?requirement))]
async fn send_visit(
    state: &AppState,
    payload: Result<Json<VisitorReport>, JsonRejection>,
    requirement: Requirement,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(report) = payload.map_err(|rejection| {
        metrics::record_visitor_notification("rejected");
        warn!(error = %rejection, "Rejected visitor report body");
        ApiError::InvalidBody(rejection.body_text())
    })?;

    let visit = report.validate(requirement).map_err(|missing| {
        metrics::record_visitor_notification("rejected");
        warn!(missing = ?missing, "Visitor report is missing fields");
        ApiError::MissingFields(missing)
    })?;

    info!(ip = %visit.ip, device = %visit.device, time = %visit.time, "Visitor reported");

    state
        .line
        .push(&state.target_id, &visit.message())
        .await
        .map_err(|e| {
            metrics::record_visitor_notification("failed");
            ApiError::Upstream(e)
        })?;

    metrics::record_visitor_notification("sent");
    info!(to = %state.target_id, "Visitor notification sent");

    Ok(Json(MessageResponse {
        message: NOTIFY_SUCCESS,
    }))
}

/// `POST /webhook` - always acknowledged with 200.
pub async fn webhook(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let batch = match WebhookBatch::parse(&body) {
        Ok(batch) => batch,
        Err(e) => {
            warn!(error = %e, bytes = body.len(), "Unreadable webhook body");
            return (StatusCode::OK, WEBHOOK_ACK);
        }
    };

    if batch.is_empty() {
        info!(destination = ?batch.destination, "Webhook without events");
        return (StatusCode::OK, WEBHOOK_ACK);
    }

    let summary = bot::dispatch(&state.line, batch).await;
    info!(
        received = summary.received,
        replied = summary.replied,
        pushed = summary.pushed,
        ignored = summary.ignored,
        failed = summary.failed,
        "Webhook batch processed"
    );

    (StatusCode::OK, WEBHOOK_ACK)
}
