use sqlx::SqlitePool;

use crate::error::{AppError, DatabaseError};
use crate::models::{NewNoSqlCollection, NoSqlCollection};

pub async fn create_for_owner(
    pool: &SqlitePool,
    collection: &NewNoSqlCollection,
    owner_id: i64,
) -> Result<NoSqlCollection, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO nosql_collections (name, description, collection_path, owner_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&collection.name)
    .bind(&collection.description)
    .bind(&collection.collection_path)
    .bind(owner_id)
    .execute(pool)
    .await?;

    sqlx::query_as::<_, NoSqlCollection>(
        "SELECT id, name, description, collection_path, owner_id FROM nosql_collections WHERE id = ?",
    )
    .bind(result.last_insert_rowid())
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::Database(DatabaseError::NotFound("Collection")))
}

pub async fn list(
    pool: &SqlitePool,
    skip: i64,
    limit: i64,
) -> Result<Vec<NoSqlCollection>, AppError> {
    let collections = sqlx::query_as::<_, NoSqlCollection>(
        r#"
        SELECT id, name, description, collection_path, owner_id
        FROM nosql_collections
        ORDER BY id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    Ok(collections)
}

pub async fn list_for_owner(
    pool: &SqlitePool,
    owner_id: i64,
) -> Result<Vec<NoSqlCollection>, AppError> {
    let collections = sqlx::query_as::<_, NoSqlCollection>(
        r#"
        SELECT id, name, description, collection_path, owner_id
        FROM nosql_collections
        WHERE owner_id = ?
        ORDER BY id
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(collections)
}
