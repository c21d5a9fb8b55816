//! Database collaborator
//!
//! A single PostgreSQL pool is opened at startup, shared for the process
//! lifetime, and closed on shutdown. Handlers reach it through the
//! [`DatabaseProbe`] port so tests can substitute a mock.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};
use thiserror::Error;

/// Database collaborator error
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

/// Connectivity port exposed to the HTTP layer
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    /// Round-trip a trivial query to verify the connection is alive.
    async fn ping(&self) -> Result<(), DbError>;
}

/// PostgreSQL-backed database handle
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Open the connection pool.
    ///
    /// Called once at startup; the pool is shared by every request.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;
        tracing::info!("database connection established");
        Ok(Self { pool })
    }

    /// Close the pool, waiting for in-flight connections to be released.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database connection closed");
    }

    /// The underlying pool, for collaborators that need direct access.
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DatabaseProbe for Database {
    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
