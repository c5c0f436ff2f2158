use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::AppConfig;

/// Opens the pool and checks the database answers before serving traffic.
pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.store_lookup_timeout())
        .connect(&config.database_url)
        .await
        .context("connect to database")?;

    sqlx::query("SELECT 1")
        .execute(&db)
        .await
        .context("database ping")?;
    info!(max_connections = config.db_max_connections, "database connection verified");

    Ok(db)
}
