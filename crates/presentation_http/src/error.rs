//! Application error taxonomy
//!
//! Operational errors are deliberately raised failures with a fixed HTTP
//! status; anything else is wrapped as [`AppError::Unexpected`]. The
//! `IntoResponse` impl is the single global handler: every failed request is
//! logged once and answered once with the response envelope. In production
//! mode, unexpected errors are reduced to a generic message.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::response::ApiResponse;

/// Global flag to control error detail exposure
/// Set to false in production to prevent information leakage
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

/// Configure whether internal error details should be exposed in responses.
///
/// Called once at startup: `false` in production, `true` otherwise.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

/// Check if internal error details should be exposed
pub(crate) fn expose_internal_errors() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// Message used for unexpected errors when details are hidden.
const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// Application error type
///
/// The first five variants are operational: each fixes an HTTP status and a
/// default message; callers may override the message but never the status.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Internal(String),

    /// Anything raised outside the taxonomy
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl AppError {
    /// 404 with the default message
    pub fn not_found() -> Self {
        Self::NotFound("Resource not found".to_string())
    }

    /// 400 with the default message
    pub fn bad_request() -> Self {
        Self::BadRequest("Bad request".to_string())
    }

    /// 401 with the default message
    pub fn unauthorized() -> Self {
        Self::Unauthorized("Authentication required".to_string())
    }

    /// 403 with the default message
    pub fn forbidden() -> Self {
        Self::Forbidden("Access denied".to_string())
    }

    /// 500 with the default message
    pub fn internal() -> Self {
        Self::Internal("Internal server error".to_string())
    }

    /// The fixed HTTP status of this error
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this error belongs to the taxonomy of deliberately raised
    /// failures. Dispatch is by variant, never by status or message text.
    pub const fn is_operational(&self) -> bool {
        !matches!(self, Self::Unexpected(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Unexpected(cause) => {
                tracing::error!(error = ?cause, "unexpected error");
                let body = if expose_internal_errors() {
                    ApiResponse::error_with_stack(cause.to_string(), Some(format!("{cause:?}")))
                } else {
                    ApiResponse::error(GENERIC_ERROR_MESSAGE)
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            operational => {
                let status = operational.status_code();
                let message = operational.to_string();
                tracing::warn!(status = status.as_u16(), error = %message, "operational error");
                (status, Json(ApiResponse::error(message))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn status_codes_are_fixed_per_variant() {
        assert_eq!(AppError::not_found().status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::bad_request().status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::unauthorized().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::forbidden().status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::internal().status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn default_messages() {
        assert_eq!(AppError::not_found().to_string(), "Resource not found");
        assert_eq!(AppError::bad_request().to_string(), "Bad request");
        assert_eq!(AppError::unauthorized().to_string(), "Authentication required");
        assert_eq!(AppError::forbidden().to_string(), "Access denied");
        assert_eq!(AppError::internal().to_string(), "Internal server error");
    }

    #[test]
    fn message_override_keeps_the_status() {
        let error = AppError::NotFound("user 42 does not exist".to_string());
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.to_string(), "user 42 does not exist");
    }

    #[test]
    fn taxonomy_members_are_operational() {
        assert!(AppError::not_found().is_operational());
        assert!(AppError::bad_request().is_operational());
        assert!(AppError::unauthorized().is_operational());
        assert!(AppError::forbidden().is_operational());
        assert!(AppError::internal().is_operational());
    }

    #[test]
    fn unexpected_is_not_operational() {
        let error = AppError::from(anyhow::anyhow!("boom"));
        assert!(!error.is_operational());
    }

    #[tokio::test]
    async fn operational_response_uses_own_status_and_message() {
        let response = AppError::NotFound("gone".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "gone");
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn unexpected_response_is_500() {
        let response = AppError::from(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn unexpected_echoes_message_and_stack_outside_production() {
        set_expose_internal_errors(true);
        let response = AppError::from(anyhow::anyhow!("boom")).into_response();

        let body = body_json(response).await;
        assert_eq!(body["message"], "boom");
        assert!(body.get("stack").is_some());
    }

    #[tokio::test]
    async fn unexpected_is_generic_in_production() {
        set_expose_internal_errors(false);
        let response = AppError::from(anyhow::anyhow!("postgres://secret@db")).into_response();

        let body = body_json(response).await;
        assert_eq!(body["message"], GENERIC_ERROR_MESSAGE);
        assert!(body.get("stack").is_none());
        set_expose_internal_errors(true);
    }
}
