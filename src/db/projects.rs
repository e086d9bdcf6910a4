use sqlx::SqlitePool;

use crate::error::{AppError, DatabaseError};
use crate::models::{NewProject, Project};

pub async fn create_for_owner(
    pool: &SqlitePool,
    project: &NewProject,
    owner_id: i64,
) -> Result<Project, AppError> {
    let result = sqlx::query("INSERT INTO projects (name, description, owner_id) VALUES (?, ?, ?)")
        .bind(&project.name)
        .bind(&project.description)
        .bind(owner_id)
        .execute(pool)
        .await?;

    find_by_id(pool, result.last_insert_rowid())
        .await?
        .ok_or(AppError::Database(DatabaseError::NotFound("Project")))
}

pub async fn find_by_id(pool: &SqlitePool, project_id: i64) -> Result<Option<Project>, AppError> {
    let project = sqlx::query_as::<_, Project>(
        "SELECT id, name, description, owner_id FROM projects WHERE id = ?",
    )
    .bind(project_id)
    .fetch_optional(pool)
    .await?;

    Ok(project)
}

pub async fn list(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<Project>, AppError> {
    let projects = sqlx::query_as::<_, Project>(
        "SELECT id, name, description, owner_id FROM projects ORDER BY id LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    Ok(projects)
}

pub async fn list_for_owner(pool: &SqlitePool, owner_id: i64) -> Result<Vec<Project>, AppError> {
    let projects = sqlx::query_as::<_, Project>(
        "SELECT id, name, description, owner_id FROM projects WHERE owner_id = ? ORDER BY id",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(projects)
}
