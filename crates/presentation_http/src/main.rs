//! Groundwork HTTP Server
//!
//! Main entry point: wires configuration, telemetry, the database pool and
//! the auth gateway, then serves the API with graceful shutdown.

use std::{sync::Arc, time::Duration};

use axum::http::{HeaderValue, Method, header};
use infrastructure::{
    auth::HttpAuthProvider,
    config::{AppConfig, Environment},
    db::Database,
    telemetry,
};
use presentation_http::{routes, set_expose_internal_errors, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Telemetry comes up before config validation so load failures are logged.
    let environment: Environment = std::env::var("NODE_ENV")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or_default();
    let _guards = telemetry::init(environment);

    info!("groundwork v{} starting", env!("CARGO_PKG_VERSION"));

    // Invalid or missing required settings abort startup with exit code 1,
    // before any port is bound.
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "configuration validation failed");
            anyhow::bail!("configuration validation failed: {err}");
        }
    };
    set_expose_internal_errors(!config.is_production());

    let db = match Database::connect(&config.database_url).await {
        Ok(db) => Arc::new(db),
        Err(err) => {
            error!(error = %err, "failed to establish database connection");
            anyhow::bail!("failed to establish database connection: {err}");
        }
    };

    let auth = Arc::new(HttpAuthProvider::new(&config.better_auth_url));
    let config = Arc::new(config);

    let state = AppState {
        db: db.clone(),
        auth,
        config: Arc::clone(&config),
    };

    let app = routes::create_router(state).layer(cors_layer(&config));

    let addr = format!("0.0.0.0:{}", config.app_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, environment = %config.node_env, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("server shutdown complete");

    Ok(())
}

/// CORS policy: configured origins, the standard mutating methods, and
/// credentialed requests with a 10 minute preflight cache.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::POST,
            Method::GET,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(600))
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {err}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            info!("received SIGTERM, initiating graceful shutdown");
        }
    }
}
