use std::time::Duration;

use crawlpool_core::AppError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::api_config::ApiConfig;

pub async fn connect_and_migrate(config: &ApiConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .idle_timeout(Duration::from_secs(config.database_idle_timeout_seconds))
        .connect(config.database_url.as_str())
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    Ok(pool)
}
