use sqlx::SqlitePool;

use crate::error::{AppError, DatabaseError};
use crate::models::{User, UserUpdate};

/// Column values for a new user row; the password is already hashed.
#[derive(Debug)]
pub struct NewUserRecord<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub full_name: Option<&'a str>,
    pub location: Option<&'a str>,
    pub organization: Option<&'a str>,
    pub hashed_password: &'a str,
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, username, full_name, location, organization, hashed_password, is_active
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, user_id: i64) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, username, full_name, location, organization, hashed_password, is_active
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn list(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<User>, AppError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, username, full_name, location, organization, hashed_password, is_active
        FROM users
        ORDER BY id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub async fn create(pool: &SqlitePool, record: NewUserRecord<'_>) -> Result<User, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (email, username, full_name, location, organization, hashed_password, is_active)
        VALUES (?, ?, ?, ?, ?, ?, 1)
        "#,
    )
    .bind(record.email)
    .bind(record.username)
    .bind(record.full_name)
    .bind(record.location)
    .bind(record.organization)
    .bind(record.hashed_password)
    .execute(pool)
    .await?;

    find_by_id(pool, result.last_insert_rowid())
        .await?
        .ok_or(AppError::Database(DatabaseError::NotFound("User")))
}

/// Applies the present fields of `update`; returns `None` for an unknown id.
pub async fn update_fields(
    pool: &SqlitePool,
    user_id: i64,
    update: &UserUpdate,
) -> Result<Option<User>, AppError> {
    let Some(mut user) = find_by_id(pool, user_id).await? else {
        return Ok(None);
    };
    update.apply_to(&mut user);

    sqlx::query(
        r#"
        UPDATE users
        SET email = ?, username = ?, full_name = ?, location = ?, organization = ?
        WHERE id = ?
        "#,
    )
    .bind(&user.email)
    .bind(&user.username)
    .bind(&user.full_name)
    .bind(&user.location)
    .bind(&user.organization)
    .bind(user.id)
    .execute(pool)
    .await?;

    Ok(Some(user))
}

pub async fn update_password(
    pool: &SqlitePool,
    user_id: i64,
    hashed_password: &str,
) -> Result<Option<User>, AppError> {
    let result = sqlx::query("UPDATE users SET hashed_password = ? WHERE id = ?")
        .bind(hashed_password)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, user_id).await
}

/// Removes the user and, by cascade, everything it owns.
/// Returns the row as it was before deletion.
pub async fn delete(pool: &SqlitePool, user_id: i64) -> Result<Option<User>, AppError> {
    let Some(user) = find_by_id(pool, user_id).await? else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(Some(user))
}
