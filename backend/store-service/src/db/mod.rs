/// Database access layer
///
/// - Connection pooling and migrations
/// - One repository module per table group, written as free functions over
///   any `PgExecutor` so services can run them inside a transaction
pub mod collection_repo;
pub mod order_repo;
pub mod product_repo;
pub mod review_repo;
pub mod user_repo;

use crate::config::DatabaseConfig;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{error, info};

/// Create a PostgreSQL pool and verify it answers queries
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .test_before_acquire(true)
        .connect(&config.url)
        .await?;

    match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => {
            info!(
                max_connections = config.max_connections,
                min_connections = config.min_connections,
                "Database pool created and verified"
            );
            Ok(pool)
        }
        Err(e) => {
            error!(error = %e, "Database connection verification failed");
            Err(e)
        }
    }
}

/// Apply embedded migrations from `migrations/`
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
