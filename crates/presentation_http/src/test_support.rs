//! Shared fixtures for unit tests

use async_trait::async_trait;
use http::HeaderMap;
use infrastructure::auth::{AuthError, AuthProvider, AuthRequest, AuthResponse, Session};
use infrastructure::config::{AppConfig, Environment};
use infrastructure::db::{DatabaseProbe, DbError};
use secrecy::SecretString;

/// A configuration that passes validation, for handler tests.
pub fn test_config() -> AppConfig {
    AppConfig {
        node_env: Environment::Test,
        app_name: "groundwork-test".to_string(),
        app_port: 3000,
        database_url: "postgres://localhost/groundwork_test".to_string(),
        better_auth_secret: SecretString::from("0123456789abcdef0123456789abcdef"),
        better_auth_url: "http://localhost:3000".to_string(),
        app_domain: None,
        cors_origins: Vec::new(),
    }
}

/// Database stub whose probe always succeeds.
pub struct HealthyDatabase;

#[async_trait]
impl DatabaseProbe for HealthyDatabase {
    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}

/// Auth provider stub for routes that never consult it.
pub struct NoopAuth;

#[async_trait]
impl AuthProvider for NoopAuth {
    async fn forward(&self, _request: AuthRequest) -> Result<AuthResponse, AuthError> {
        Err(AuthError::Unreachable("no provider in tests".to_string()))
    }

    async fn session(&self, _headers: &HeaderMap) -> Result<Option<Session>, AuthError> {
        Ok(None)
    }
}
