//! Groundwork infrastructure layer
//!
//! Configuration, telemetry, and the external collaborators (database pool,
//! auth provider gateway) consumed by the HTTP layer.

pub mod auth;
pub mod config;
pub mod db;
pub mod telemetry;

pub use auth::{AuthError, AuthProvider, AuthRequest, AuthResponse, HttpAuthProvider, Session};
pub use config::{AppConfig, Environment};
pub use db::{Database, DatabaseProbe, DbError};
