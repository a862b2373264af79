//! Persistence layer: row models, repositories and the [`EntityStore`] seam.
//!
//! [`PgStore`] backs the store with PostgreSQL through the repositories;
//! [`MemoryStore`] keeps everything in process for tests and local tooling.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod memory;
pub mod models;
pub mod pg_store;
pub mod repositories;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use pg_store::PgStore;
pub use store::EntityStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
///
/// Lock waits are bounded by `acquire_timeout` and the server-side
/// `lock_timeout`, so a contended row surfaces as a transient error instead of
/// blocking the caller indefinitely.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("SET lock_timeout = '5s'").execute(conn).await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    let migrator = sqlx::migrate!("../../db/migrations");
    migrator.run(pool).await?;
    tracing::info!(count = migrator.iter().count(), "Database migrations applied");
    Ok(())
}
