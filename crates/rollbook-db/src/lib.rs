//! # Rollbook DB
//!
//! Database pool and migrations for the Rollbook API.
//!
//! This crate provides PostgreSQL connection pool initialization using SQLx
//! and the embedded migrator for the `students` schema.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
//! - `DATABASE_ACQUIRE_TIMEOUT_SECS`: Seconds to wait for a free connection (default: 5)
//! - `DATABASE_RUN_MIGRATIONS`: Apply pending migrations on startup (default: true)
//!
//! # Example
//!
//! ```ignore
//! use rollbook_db::{DatabaseConfig, init_db_pool};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sqlx::Error> {
//!     let config = DatabaseConfig::from_env().expect("DATABASE_URL must be set");
//!     let pool = init_db_pool(&config).await?;
//!     // Use pool for database operations
//!     Ok(())
//! }
//! ```

use std::env;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Migrations applied to the `students` schema.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Connection pool settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub run_migrations: bool,
}

impl DatabaseConfig {
    /// Settings for `url` with every other value at its default.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout_secs: 5,
            run_migrations: true,
        }
    }

    /// Reads the configuration from the environment.
    ///
    /// Returns `None` when `DATABASE_URL` is not set. Unparseable optional
    /// values fall back to their defaults.
    pub fn from_env() -> Option<Self> {
        let url = env::var("DATABASE_URL").ok()?;
        let defaults = Self::new(url);

        Some(Self {
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_connections),
            acquire_timeout_secs: env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.acquire_timeout_secs),
            run_migrations: env::var("DATABASE_RUN_MIGRATIONS")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.run_migrations),
            ..defaults
        })
    }
}

/// Initializes a PostgreSQL connection pool and applies pending migrations
/// when `run_migrations` is set.
///
/// The returned pool is cheaply cloneable and should be passed to the
/// application state for use in request handlers.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await?;

    info!(
        max_connections = config.max_connections,
        "Database pool initialized"
    );

    if config.run_migrations {
        MIGRATOR.run(&pool).await?;
        info!("Database migrations applied");
    }

    Ok(pool)
}
