//! Application configuration
//!
//! Settings come from environment variables (with `.env` support handled by
//! the binary) and are validated once at startup. Invalid or missing required
//! values abort startup before the server binds a port.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Application environment (development, production, or test)
///
/// Controls log verbosity, file log sinks, and how much error detail is
/// exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment - verbose logs, full error details
    #[default]
    Development,
    /// Production environment - file log sinks, sanitized error responses
    Production,
    /// Test environment
    Test,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Test => write!(f, "test"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development', 'production' or 'test'"
            )),
        }
    }
}

/// Main application configuration
///
/// Field names map to environment variables one to one: `node_env` is
/// `NODE_ENV`, `database_url` is `DATABASE_URL`, and so on.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppConfig {
    /// Application environment (`NODE_ENV`)
    #[serde(default)]
    pub node_env: Environment,

    /// Application name (`APP_NAME`)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Port to bind to (`APP_PORT`)
    #[serde(default = "default_app_port")]
    pub app_port: u16,

    /// Database connection URL (`DATABASE_URL`, required)
    pub database_url: String,

    /// Shared secret of the auth provider (`BETTER_AUTH_SECRET`, required)
    #[validate(custom(function = validate_auth_secret))]
    pub better_auth_secret: SecretString,

    /// Base URL of the auth provider (`BETTER_AUTH_URL`, required)
    #[validate(url(message = "must be a valid URL"))]
    pub better_auth_url: String,

    /// Cookie domain for cross-subdomain setups (`APP_DOMAIN`)
    #[serde(default)]
    pub app_domain: Option<String>,

    /// Additional allowed CORS origins (`CORS_ORIGINS`, comma-separated)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_app_name() -> String {
    "groundwork".to_string()
}

const fn default_app_port() -> u16 {
    3000
}

/// The auth secret signs session material; short secrets are rejected.
fn validate_auth_secret(secret: &SecretString) -> Result<(), ValidationError> {
    if secret.expose_secret().len() < 32 {
        let mut error = ValidationError::new("length");
        error.message = Some("must be at least 32 characters".into());
        return Err(error);
    }
    Ok(())
}

impl AppConfig {
    /// Load configuration from the environment and validate it.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            // Start with defaults
            .set_default("node_env", "development")?
            .set_default("app_name", default_app_name())?
            .set_default("app_port", i64::from(default_app_port()))?
            // Override with environment variables (NODE_ENV, DATABASE_URL, ...)
            .add_source(
                config::Environment::default()
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_origins"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config
            .validate()
            .map_err(|errors| config::ConfigError::Message(format_validation_errors(&errors)))?;
        Ok(config)
    }

    /// True when running with the production configuration.
    pub const fn is_production(&self) -> bool {
        matches!(self.node_env, Environment::Production)
    }

    /// Origins the CORS layer accepts: `CORS_ORIGINS` when set, otherwise
    /// the single auth provider URL.
    pub fn allowed_origins(&self) -> Vec<String> {
        if self.cors_origins.is_empty() {
            vec![self.better_auth_url.clone()]
        } else {
            self.cors_origins.clone()
        }
    }
}

fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let details: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            field_errors
                .iter()
                .map(|error| {
                    format!(
                        "{}: {}",
                        field,
                        error
                            .message
                            .as_ref()
                            .map_or_else(|| error.code.to_string(), ToString::to_string)
                    )
                })
                .collect::<Vec<_>>()
        })
        .collect();
    details.join("; ")
}
