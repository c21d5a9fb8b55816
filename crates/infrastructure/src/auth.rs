//! Auth provider gateway
//!
//! Authentication is owned by an external provider; this module only knows
//! its call/response contract. Requests under `/api/auth/*` are forwarded
//! verbatim, and session lookups hit the provider's `get-session` endpoint
//! with the caller's credentials attached.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::{HeaderMap, HeaderName, Method, StatusCode, header};
use serde::Deserialize;
use thiserror::Error;

/// Auth gateway error
#[derive(Debug, Error)]
pub enum AuthError {
    /// The provider could not be reached (connect/timeout)
    #[error("auth provider unreachable: {0}")]
    Unreachable(String),

    /// The provider answered with something we could not process
    #[error("auth provider returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Unreachable(err.to_string())
        } else {
            Self::InvalidResponse(err.to_string())
        }
    }
}

/// A request to be delegated to the auth provider, as received from the client
#[derive(Debug)]
pub struct AuthRequest {
    pub method: Method,
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// The provider's answer, relayed back to the client unchanged
#[derive(Debug)]
pub struct AuthResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// The user attached to a session
#[derive(Debug, Clone, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Session metadata
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMeta {
    pub expires_at: DateTime<Utc>,
}

/// An authenticated session as reported by the provider
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub user: SessionUser,
    pub session: SessionMeta,
}

/// Gateway port to the external auth provider
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Forward a raw auth request and relay the provider's response.
    async fn forward(&self, request: AuthRequest) -> Result<AuthResponse, AuthError>;

    /// Look up the session bound to the caller's cookie or bearer token.
    ///
    /// `Ok(None)` means the provider answered and no session exists.
    async fn session(&self, headers: &HeaderMap) -> Result<Option<Session>, AuthError>;
}

/// HTTP implementation of [`AuthProvider`]
#[derive(Debug, Clone)]
pub struct HttpAuthProvider {
    base_url: String,
    client: reqwest::Client,
}

// Headers owned by each hop; never forwarded in either direction.
const HOP_BY_HOP_HEADERS: [HeaderName; 4] = [
    header::CONNECTION,
    header::CONTENT_LENGTH,
    header::HOST,
    header::TRANSFER_ENCODING,
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(name)
}

impl HttpAuthProvider {
    /// Create a gateway targeting the provider at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn forward(&self, request: AuthRequest) -> Result<AuthResponse, AuthError> {
        let url = format!("{}{}", self.base_url, request.path_and_query);
        let mut upstream = self.client.request(request.method, &url);
        for (name, value) in &request.headers {
            if !is_hop_by_hop(name) {
                upstream = upstream.header(name, value);
            }
        }

        let response = upstream.body(request.body.to_vec()).send().await?;

        let status = response.status();
        let mut headers = HeaderMap::new();
        for (name, value) in response.headers() {
            if !is_hop_by_hop(name) {
                headers.append(name, value.clone());
            }
        }
        let body = response.bytes().await?;

        Ok(AuthResponse {
            status,
            headers,
            body,
        })
    }

    async fn session(&self, headers: &HeaderMap) -> Result<Option<Session>, AuthError> {
        let url = format!("{}/api/auth/get-session", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(cookie) = headers.get(header::COOKIE) {
            request = request.header(header::COOKIE, cookie);
        }
        if let Some(authorization) = headers.get(header::AUTHORIZATION) {
            request = request.header(header::AUTHORIZATION, authorization);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Ok(None);
        }

        // The provider answers `null` when no session is bound.
        let session = response
            .json::<Option<Session>>()
            .await
            .map_err(|err| AuthError::InvalidResponse(err.to_string()))?;
        Ok(session)
    }
}
