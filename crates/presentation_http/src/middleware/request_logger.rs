//! Request logging middleware
//!
//! Records method, path, client IP and duration for every request. The log
//! level of the completion line follows the response status: server errors
//! log at error, client errors at warn, everything else at info. The
//! middleware observes only; it never mutates the request or response and
//! never swallows an error.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use axum::{body::Body, extract::Request, http::HeaderMap, response::Response};
use tower::{Layer, Service};

/// Layer that adds request logging to HTTP services
#[derive(Debug, Clone, Default)]
pub struct RequestLoggerLayer;

impl RequestLoggerLayer {
    /// Create a new request logger layer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestLoggerLayer {
    type Service = RequestLoggerService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLoggerService { inner }
    }
}

/// Service that logs the start and outcome of each request
#[derive(Debug, Clone)]
pub struct RequestLoggerService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestLoggerService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: std::fmt::Display,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let method = request.method().to_string();
        let path = request.uri().path().to_string();
        let ip = client_ip(request.headers());
        let start = Instant::now();

        tracing::debug!(
            method = %method,
            path = %path,
            ip = ip.as_deref(),
            "request started"
        );

        let mut inner = self.inner.clone();

        Box::pin(async move {
            match inner.call(request).await {
                Ok(response) => {
                    let elapsed_ms = elapsed_ms(start);
                    let status = response.status().as_u16();
                    if response.status().is_server_error() {
                        tracing::error!(
                            method = %method,
                            path = %path,
                            status,
                            elapsed_ms,
                            ip = ip.as_deref(),
                            "request completed"
                        );
                    } else if response.status().is_client_error() {
                        tracing::warn!(
                            method = %method,
                            path = %path,
                            status,
                            elapsed_ms,
                            ip = ip.as_deref(),
                            "request completed"
                        );
                    } else {
                        tracing::info!(
                            method = %method,
                            path = %path,
                            status,
                            elapsed_ms,
                            ip = ip.as_deref(),
                            "request completed"
                        );
                    }
                    Ok(response)
                }
                Err(err) => {
                    let elapsed_ms = elapsed_ms(start);
                    tracing::error!(
                        method = %method,
                        path = %path,
                        error = %err,
                        elapsed_ms,
                        ip = ip.as_deref(),
                        "request failed"
                    );
                    Err(err)
                }
            }
        })
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Client IP from proxy headers: `x-forwarded-for` takes precedence over
/// `x-real-ip`; absent when neither is set.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        })
}
