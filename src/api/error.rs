//! Handler error type and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::error::LineApiError;

/// Errors a visitor-notify request can end in.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required visitor fields were absent or blank.
    #[error("Missing visitor data ({})", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Body could not be read as a JSON object.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// LINE did not accept the notification.
    #[error("Failed to send LINE notification.")]
    Upstream(#[from] LineApiError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Names of missing fields.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<&'static str>,
    /// Upstream failure detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.to_string();
        let (status, missing, detail) = match self {
            Self::MissingFields(fields) => (StatusCode::BAD_REQUEST, fields, None),
            Self::InvalidBody(_) => (StatusCode::BAD_REQUEST, Vec::new(), None),
            Self::Upstream(e) => (StatusCode::INTERNAL_SERVER_ERROR, Vec::new(), Some(e.to_string())),
        };

        let body = Json(ErrorResponse {
            error,
            missing,
            detail,
        });

        (status, body).into_response()
    }
}
