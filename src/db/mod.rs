/// Persistence layer
///
/// Plain async functions over a `SqlitePool`, one module per table. Lookups
/// return `Ok(None)` for a missing row and leave the 404 decision to callers.

pub mod collections;
pub mod items;
pub mod projects;
pub mod users;
pub mod workflows;

use sqlx::SqlitePool;

use crate::error::AppError;

/// Applies the embedded migrations from `migrations/`
pub async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    // a single connection, otherwise every connection gets its own empty database
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    migrate(&pool).await.expect("Failed to migrate the database");
    pool
}
