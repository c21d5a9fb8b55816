//! OpenAPI documentation module
//!
//! Serves the generated OpenAPI 3 document with Swagger UI and ReDoc.
//! Route metadata lives in the declarative `#[utoipa::path]` entries on the
//! handlers; nothing is attached at runtime.

use axum::{Router, response::Html, routing::get};
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable as RedocServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    handlers,
    handlers::health::{ApiCheck, DatabaseCheck, ExtendedHealth, HealthChecks},
    response::{ApiResponse, ResponseStatus},
    state::AppState,
};

/// OpenAPI documentation for the Groundwork API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Groundwork API",
        version = "0.1.0",
        description = "HTTP API scaffold with health checks, database and auth collaborators",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        handlers::health::health,
        handlers::health::extended_health,
    ),
    components(
        schemas(
            ApiResponse<serde_json::Value>,
            ApiResponse<ExtendedHealth>,
            ResponseStatus,
            ExtendedHealth,
            HealthChecks,
            ApiCheck,
            DatabaseCheck,
        )
    )
)]
#[derive(Debug)]
pub struct ApiDoc;

/// Create OpenAPI documentation routes
///
/// Adds the following routes:
/// - `/api-docs/openapi.json` - OpenAPI specification (used by Swagger UI)
/// - `/swagger-ui/*` - Swagger UI interactive documentation
/// - `/redoc` - ReDoc documentation
pub fn create_openapi_routes() -> Router<AppState> {
    let redoc = Redoc::with_url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new()
        .route("/redoc", get(|| async move { Html(redoc.to_html()) }))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_spec_is_valid() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&doc).expect("Failed to serialize OpenAPI spec");
        assert!(json.contains("Groundwork API"));
        assert!(json.contains("/api/health"));
        assert!(json.contains("/api/health/extended"));
    }

    #[test]
    fn openapi_has_the_health_tag() {
        let doc = ApiDoc::openapi();
        let tags: Vec<&str> = doc
            .tags
            .as_ref()
            .map(|tags| tags.iter().map(|tag| tag.name.as_str()).collect())
            .unwrap_or_default();

        assert!(tags.contains(&"health"));
    }

    #[test]
    fn openapi_documents_the_envelope_schema() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("Missing components");
        assert!(
            components
                .schemas
                .keys()
                .any(|name| name.contains("ApiResponse"))
        );
    }
}
