use sqlx::SqlitePool;

use crate::error::{AppError, DatabaseError};
use crate::models::{Item, NewItem};

pub async fn create_for_owner(
    pool: &SqlitePool,
    item: &NewItem,
    owner_id: i64,
) -> Result<Item, AppError> {
    let result = sqlx::query("INSERT INTO items (title, description, owner_id) VALUES (?, ?, ?)")
        .bind(&item.title)
        .bind(&item.description)
        .bind(owner_id)
        .execute(pool)
        .await?;

    sqlx::query_as::<_, Item>("SELECT id, title, description, owner_id FROM items WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::Database(DatabaseError::NotFound("Item")))
}

pub async fn list(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<Item>, AppError> {
    let items = sqlx::query_as::<_, Item>(
        "SELECT id, title, description, owner_id FROM items ORDER BY id LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn list_for_owner(pool: &SqlitePool, owner_id: i64) -> Result<Vec<Item>, AppError> {
    let items = sqlx::query_as::<_, Item>(
        "SELECT id, title, description, owner_id FROM items WHERE owner_id = ? ORDER BY id",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}
