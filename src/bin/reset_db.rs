//! Drops every table and re-applies the embedded migrations.
//!
//! Usage: `DATABASE_URL=postgres://... cargo run --bin reset_db`

use microblog_app::db::postgres::{PostgresDatabase, MIGRATOR};
use microblog_app::AppConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const TABLES: &[&str] = &["follows", "posts", "users", "_sqlx_migrations"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    if config.uses_memory_database() {
        warn!("⚠️ RESET: DATABASE_URL points at the in-memory store, nothing to reset");
        return Ok(());
    }

    let database = PostgresDatabase::new(&config.database_url).await?;

    let mut tx = database.pool.begin().await?;
    for table in TABLES {
        sqlx::query(&format!("DROP TABLE IF EXISTS {} CASCADE", table))
            .execute(&mut *tx)
            .await?;
        info!("🗑️ RESET: Dropped {}", table);
    }
    tx.commit().await?;

    MIGRATOR.run(&*database.pool).await?;
    info!("✅ RESET: Schema recreated");

    Ok(())
}
