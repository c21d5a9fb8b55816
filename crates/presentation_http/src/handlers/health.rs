//! Health check handlers

use std::time::Instant;

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    response::{ApiResponse, collaborator_error},
    state::AppState,
};

/// Status of a single health check
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiCheck {
    pub status: String,
}

/// Status of the database probe, with the measured round-trip time
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DatabaseCheck {
    pub status: String,
    #[serde(rename = "responseTime")]
    pub response_time: String,
}

/// Results of every individual check
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthChecks {
    pub api: ApiCheck,
    pub database: DatabaseCheck,
}

/// Payload of the extended health endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExtendedHealth {
    pub checks: HealthChecks,
}

/// Basic liveness check - is the API answering?
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "API is alive", body = ApiResponse<serde_json::Value>)
    )
)]
pub async fn health() -> Json<ApiResponse> {
    Json(ApiResponse::success(
        Some(serde_json::Value::Null),
        Some("API is running"),
    ))
}

/// Extended health check - probes the database collaborator
#[utoipa::path(
    get,
    path = "/api/health/extended",
    tag = "health",
    responses(
        (status = 200, description = "All systems operational", body = ApiResponse<ExtendedHealth>),
        (status = 500, description = "A collaborator check failed", body = ApiResponse<serde_json::Value>)
    )
)]
pub async fn extended_health(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    match state.db.ping().await {
        Ok(()) => {
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            tracing::info!(db_response_time_ms = elapsed_ms, "extended health check completed");

            let payload = ExtendedHealth {
                checks: HealthChecks {
                    api: ApiCheck {
                        status: "ok".to_string(),
                    },
                    database: DatabaseCheck {
                        status: "ok".to_string(),
                        response_time: format!("{elapsed_ms}ms"),
                    },
                },
            };
            Json(ApiResponse::success(
                Some(payload),
                Some("All systems operational"),
            ))
            .into_response()
        }
        Err(err) => collaborator_error("Health check failed", &err),
    }
}
