//! Application state shared across handlers

use std::sync::Arc;

use infrastructure::{auth::AuthProvider, config::AppConfig, db::DatabaseProbe};

/// Shared application state
///
/// Collaborators are held behind their ports so tests can substitute mocks.
/// Everything here is constructed once at startup and passed by reference;
/// there are no ambient singletons.
#[derive(Clone)]
pub struct AppState {
    /// Database collaborator, probed by the health endpoints
    pub db: Arc<dyn DatabaseProbe>,
    /// External auth provider gateway
    pub auth: Arc<dyn AuthProvider>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}
