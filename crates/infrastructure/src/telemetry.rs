//! Logging and tracing initialization
//!
//! Console output everywhere; in production, JSON log files are written to
//! `logs/combined.log` (all levels) and `logs/error.log` (errors only).

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::Environment;

/// Directory the production log files are written to.
const LOG_DIR: &str = "logs";

/// Initialize the global tracing subscriber.
///
/// Returns the worker guards of the non-blocking file writers; the caller
/// must keep them alive for the lifetime of the process or buffered log
/// lines are lost on shutdown.
///
/// `RUST_LOG` overrides the environment-derived default level
/// (`info` in production, `debug` otherwise).
pub fn init(environment: Environment) -> Vec<WorkerGuard> {
    let default_directives = if environment == Environment::Production {
        "info"
    } else {
        "debug"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directives));

    let mut guards = Vec::new();

    if environment == Environment::Production {
        let (combined, combined_guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(LOG_DIR, "combined.log"));
        let (errors, errors_guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(LOG_DIR, "error.log"));
        guards.push(combined_guard);
        guards.push(errors_guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .with(tracing_subscriber::fmt::layer().json().with_writer(combined))
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(errors)
                    .with_filter(LevelFilter::ERROR),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    guards
}
