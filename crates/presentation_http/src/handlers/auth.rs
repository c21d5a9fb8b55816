//! Auth delegation handlers
//!
//! Everything under `/api/auth/*` belongs to the external auth provider;
//! requests are forwarded verbatim through the gateway and the provider's
//! answer is relayed unchanged.

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    response::Response,
};
use infrastructure::auth::{AuthRequest, Session};

use crate::{error::AppError, state::AppState};

/// Largest auth request body we are willing to buffer for forwarding.
const AUTH_BODY_LIMIT: usize = 1024 * 1024;

/// Forward an auth request untouched to the external auth provider.
pub async fn proxy(State(state): State<AppState>, request: Request) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path().to_string(), ToString::to_string);

    let body = axum::body::to_bytes(body, AUTH_BODY_LIMIT)
        .await
        .map_err(|err| AppError::BadRequest(format!("Unreadable request body: {err}")))?;

    let upstream = state
        .auth
        .forward(AuthRequest {
            method: parts.method,
            path_and_query,
            headers: parts.headers,
            body,
        })
        .await
        .map_err(|err| AppError::Internal(err.to_string()))?;

    let mut builder = Response::builder().status(upstream.status);
    if let Some(headers) = builder.headers_mut() {
        headers.extend(upstream.headers);
    }
    builder
        .body(Body::from(upstream.body))
        .map_err(|err| AppError::Internal(err.to_string()))
}

/// Extractor that requires an authenticated session.
///
/// Rejects with 401 when the provider reports no session or cannot be
/// consulted.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Session);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = state.auth.session(&parts.headers).await.map_err(|err| {
            tracing::error!(error = %err, "session lookup failed");
            AppError::unauthorized()
        })?;
        session.map(Self).ok_or_else(AppError::unauthorized)
    }
}
