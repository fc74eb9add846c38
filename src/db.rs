use anyhow::Context;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::info;

/// Builds the connection pool the service shares between requests
pub async fn connect_sqlx(db_url: &str) -> Result<PgPool, anyhow::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(2))
        .connect(db_url)
        .await
        .context("connecting to the invoice database")
}

/// Brings the schema up to date with the migrations under `migrations/`
pub async fn run_migrations(db: &PgPool) -> Result<(), anyhow::Error> {
    sqlx::migrate!()
        .run(db)
        .await
        .context("running database migrations")?;
    info!("Database schema is up to date");

    Ok(())
}
