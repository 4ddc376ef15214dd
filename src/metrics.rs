//! Prometheus metrics for outbound LINE calls and inbound traffic.
//!
//! This module provides metrics for:
//! - LINE Messaging API latency per endpoint
//! - Messages sent and failed per kind (push, reply)
//! - Visitor notification outcomes
//! - Webhook events per event type

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{debug, warn};

// === Metric Name Constants ===

/// LINE API request latency metric name.
pub const METRIC_LINE_API_LATENCY: &str = "line_api_latency_ms";
/// Messages accepted by LINE counter metric name.
pub const METRIC_LINE_MESSAGES_SENT: &str = "line_messages_sent_total";
/// Messages rejected by LINE or lost in transit counter metric name.
pub const METRIC_LINE_MESSAGES_FAILED: &str = "line_messages_failed_total";
/// Visitor notification requests counter metric name.
pub const METRIC_VISITOR_NOTIFICATIONS: &str = "visitor_notifications_total";
/// Webhook events received counter metric name.
pub const METRIC_WEBHOOK_EVENTS: &str = "webhook_events_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_LINE_API_LATENCY,
        "LINE Messaging API request latency in milliseconds"
    );

    describe_counter!(
        METRIC_LINE_MESSAGES_SENT,
        "Total number of messages accepted by the LINE API"
    );
    describe_counter!(
        METRIC_LINE_MESSAGES_FAILED,
        "Total number of messages the LINE API did not accept"
    );
    describe_counter!(
        METRIC_VISITOR_NOTIFICATIONS,
        "Total number of visitor notification requests by outcome"
    );
    describe_counter!(
        METRIC_WEBHOOK_EVENTS,
        "Total number of webhook events received by event type"
    );

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder.
///
/// Returns `None` if a recorder is already installed, which happens when the
/// process tries to install twice.
pub fn install_prometheus() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            init_metrics();
            Some(handle)
        }
        Err(e) => {
            warn!(error = %e, "Failed to install Prometheus recorder");
            None
        }
    }
}

/// Record a LINE API call outcome.
pub fn record_line_call(kind: &'static str, success: bool) {
    if success {
        counter!(METRIC_LINE_MESSAGES_SENT, "kind" => kind).increment(1);
    } else {
        counter!(METRIC_LINE_MESSAGES_FAILED, "kind" => kind).increment(1);
    }
}

/// Record a visitor notification outcome (`sent`, `rejected`, `failed`).
pub fn record_visitor_notification(outcome: &'static str) {
    counter!(METRIC_VISITOR_NOTIFICATIONS, "outcome" => outcome).increment(1);
}

/// Record a received webhook event (`message`, `follow`, `unfollow`, `other`,
/// `malformed`).
pub fn record_webhook_event(kind: &'static str) {
    counter!(METRIC_WEBHOOK_EVENTS, "kind" => kind).increment(1);
}

/// RAII guard for timing LINE API calls.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    endpoint: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given endpoint label.
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            start: Instant::now(),
            endpoint,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(METRIC_LINE_API_LATENCY, "endpoint" => self.endpoint).record(self.elapsed_ms());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn latency_timer_measures_time() {
        let timer = LatencyTimer::new("push");
        sleep(Duration::from_millis(10));
        let elapsed = timer.elapsed_ms();
        assert!(elapsed >= 9.0); // Allow some tolerance
    }

    #[test]
    fn counters_are_labelled_by_kind_and_outcome() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_line_call("push", true);
            record_line_call("push", true);
            record_line_call("reply", false);
            record_visitor_notification("sent");
            record_webhook_event("follow");
        });

        let rendered = handle.render();
        assert!(rendered.contains(r#"line_messages_sent_total{kind="push"} 2"#), "{}", rendered);
        assert!(rendered.contains(r#"line_messages_failed_total{kind="reply"} 1"#), "{}", rendered);
        assert!(rendered.contains(r#"visitor_notifications_total{outcome="sent"} 1"#), "{}", rendered);
        assert!(rendered.contains(r#"webhook_events_total{kind="follow"} 1"#), "{}", rendered);
    }
}
