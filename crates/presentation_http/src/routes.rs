//! Route definitions
//!
//! Routers are static wiring resolved once at startup: a route table maps
//! each path prefix to its sub-router, and `mount` folds the table onto a
//! root router.

use axum::{
    Router,
    routing::{any, get},
};

use crate::{
    error::AppError, handlers, middleware::request_logger::RequestLoggerLayer, openapi,
    state::AppState,
};

/// Route table mapping a path prefix to its sub-router
pub type RouteTable = Vec<(&'static str, Router<AppState>)>;

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::health::health))
        .route("/extended", get(handlers::health::extended_health))
}

/// Every API sub-router and the prefix it is mounted under.
/// New route groups are registered here.
fn api_routes() -> RouteTable {
    vec![("/health", health_routes())]
}

/// Mount every sub-router of `routes` under its prefix on `root`.
pub fn mount(root: Router<AppState>, routes: RouteTable) -> Router<AppState> {
    routes
        .into_iter()
        .fold(root, |router, (prefix, sub_router)| router.nest(prefix, sub_router))
}

/// Global fallback for unmatched routes.
async fn not_found() -> AppError {
    AppError::not_found()
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let api = mount(Router::new(), api_routes())
        // Everything under /api/auth belongs to the external auth provider
        .route("/auth/{*path}", any(handlers::auth::proxy));

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_routes())
        .fallback(not_found)
        .layer(RequestLoggerLayer::new())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{HealthyDatabase, NoopAuth, test_config};

    fn test_state() -> AppState {
        AppState {
            db: Arc::new(HealthyDatabase),
            auth: Arc::new(NoopAuth),
            config: Arc::new(test_config()),
        }
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unmatched_routes_return_the_404_envelope() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Resource not found");
    }

    #[tokio::test]
    async fn health_routes_are_mounted_under_api() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn mount_registers_ad_hoc_route_groups() {
        let extras: RouteTable = vec![(
            "/extras",
            Router::new().route("/ping", get(|| async { "pong" })),
        )];
        let app = mount(Router::new(), extras).with_state(test_state());

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/extras/ping")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
