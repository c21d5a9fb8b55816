//! Response envelope
//!
//! Every endpoint answers with the same JSON shape:
//! `{ status, message?, data?, timestamp }`. Error bodies never carry `data`;
//! outside production a `stack` diagnostic may be attached by the error
//! handler.

use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome discriminator of the envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Uniform response wrapper
///
/// `data: Some(Value::Null)` serializes to an explicit `"data": null`, which
/// the basic health endpoint relies on; `None` omits the field entirely.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T = serde_json::Value> {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: DateTime<Utc>,
    /// Debug-formatted error chain, attached only outside production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Build a success envelope with optional payload and message.
    pub fn success(data: Option<T>, message: Option<&str>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.map(str::to_string),
            data,
            timestamp: Utc::now(),
            stack: None,
        }
    }
}

impl ApiResponse<serde_json::Value> {
    /// Build an error envelope. Error responses never carry `data`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some(message.into()),
            data: None,
            timestamp: Utc::now(),
            stack: None,
        }
    }

    /// Error envelope with a diagnostic stack, for non-production responses.
    pub fn error_with_stack(message: impl Into<String>, stack: Option<String>) -> Self {
        Self {
            stack,
            ..Self::error(message)
        }
    }
}

/// Shape a collaborator failure as a 500 error envelope.
///
/// The cause is logged at error level; the client sees it only outside
/// production, where `message` is replaced by the cause's own text. In
/// production the generic `message` is all that leaves the process.
pub fn collaborator_error(message: &str, cause: &(dyn std::error::Error + 'static)) -> Response {
    tracing::error!(error = %cause, "{}", message);
    let body = if crate::error::expose_internal_errors() {
        ApiResponse::error_with_stack(cause.to_string(), Some(format!("{cause:?}")))
    } else {
        ApiResponse::error(message)
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
