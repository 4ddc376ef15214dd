//! Visitor notification relay for the LINE Messaging API.
//!
//! A static website reports each visit to this service, which pushes a
//! summary to a fixed LINE recipient. The same service answers the LINE
//! webhook: text messages get a command response or an echo through the
//! event's reply token, and new followers get a welcome push.
//!
//! ```text
//! website ──POST /notify-visitor──▶ relay ──push──▶ LINE ──▶ owner
//! LINE ─────POST /webhook─────────▶ relay ──reply/push──▶ LINE ──▶ user
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`line`]: LINE Messaging API client, payloads and webhook events
//! - [`bot`]: Command table and webhook event dispatch
//! - [`visitor`]: Visitor report validation and message text
//! - [`api`]: HTTP routes and handlers
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod bot;
pub mod config;
pub mod error;
pub mod line;
pub mod metrics;
pub mod utils;
pub mod visitor;

pub use config::Config;
pub use error::{RelayError, Result};
