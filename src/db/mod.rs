pub mod memory;
pub mod postgres;
pub mod repository;

// Database connection and state management
use std::sync::Arc;

use crate::config::AppConfig;
use crate::utils::retry::{retry_with_backoff, RetryConfig};
use crate::Result;
use memory::MemoryDatabase;
use postgres::PostgresDatabase;
use repository::{FollowRepository, PostRepository, UserRepository};

#[derive(Clone)]
enum Backend {
    Postgres(Arc<PostgresDatabase>),
    Memory,
}

#[derive(Clone)]
pub struct DatabaseClient {
    backend: Backend,
    pub user_repo: Arc<dyn UserRepository>,
    pub post_repo: Arc<dyn PostRepository>,
    pub follow_repo: Arc<dyn FollowRepository>,
}

impl DatabaseClient {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        if config.uses_memory_database() {
            tracing::warn!("⚠️ DATABASE: Using in-memory store, data is lost on exit");
            return Ok(Self::in_memory(MemoryDatabase::new()));
        }

        let database = retry_with_backoff("connect to PostgreSQL", RetryConfig::default(), || {
            PostgresDatabase::new(&config.database_url)
        })
        .await?;
        database.run_migrations().await?;

        Ok(Self::postgres(database))
    }

    pub fn postgres(database: PostgresDatabase) -> Self {
        Self {
            user_repo: Arc::new(database.user_repo()),
            post_repo: Arc::new(database.post_repo()),
            follow_repo: Arc::new(database.follow_repo()),
            backend: Backend::Postgres(Arc::new(database)),
        }
    }

    pub fn in_memory(database: MemoryDatabase) -> Self {
        Self {
            backend: Backend::Memory,
            user_repo: Arc::new(database.clone()),
            post_repo: Arc::new(database.clone()),
            follow_repo: Arc::new(database),
        }
    }

    pub async fn health_check(&self) -> Result<()> {
        match &self.backend {
            Backend::Postgres(database) => database.health_check().await,
            Backend::Memory => Ok(()),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Postgres(_) => "postgres",
            Backend::Memory => "memory",
        }
    }
}
