use std::sync::Arc;

use rollbook_db::{DatabaseConfig, init_db_pool};

use crate::config::cors::CorsConfig;
use crate::modules::students::repository::{
    InMemoryStudentRepository, PgStudentRepository, StudentRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub students: Arc<dyn StudentRepository>,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(students: Arc<dyn StudentRepository>, cors_config: CorsConfig) -> Self {
        Self {
            students,
            cors_config,
        }
    }

    /// State backed by a fresh in-memory store, for tests and local demos.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryStudentRepository::new()),
            CorsConfig::default(),
        )
    }
}

/// Connects to PostgreSQL using `DatabaseConfig::from_env`.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db_config = DatabaseConfig::from_env()
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let db = init_db_pool(&db_config).await?;

    Ok(AppState::new(
        Arc::new(PgStudentRepository::new(db)),
        CorsConfig::from_env(),
    ))
}
