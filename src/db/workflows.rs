use sqlx::SqlitePool;

use crate::error::{AppError, DatabaseError};
use crate::models::{NewWorkflow, Workflow};

pub async fn create_for_owner(
    pool: &SqlitePool,
    workflow: &NewWorkflow,
    owner_id: i64,
) -> Result<Workflow, AppError> {
    let result = sqlx::query(
        "INSERT INTO workflows (name, description, project_id, owner_id) VALUES (?, ?, ?, ?)",
    )
    .bind(&workflow.name)
    .bind(&workflow.description)
    .bind(workflow.project_id)
    .bind(owner_id)
    .execute(pool)
    .await?;

    sqlx::query_as::<_, Workflow>(
        "SELECT id, name, description, project_id, owner_id FROM workflows WHERE id = ?",
    )
    .bind(result.last_insert_rowid())
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::Database(DatabaseError::NotFound("Workflow")))
}

pub async fn find_in_project_by_name(
    pool: &SqlitePool,
    project_id: i64,
    name: &str,
) -> Result<Option<Workflow>, AppError> {
    let workflow = sqlx::query_as::<_, Workflow>(
        r#"
        SELECT id, name, description, project_id, owner_id
        FROM workflows
        WHERE project_id = ? AND name = ?
        "#,
    )
    .bind(project_id)
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(workflow)
}

pub async fn list(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<Workflow>, AppError> {
    let workflows = sqlx::query_as::<_, Workflow>(
        r#"
        SELECT id, name, description, project_id, owner_id
        FROM workflows
        ORDER BY id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    Ok(workflows)
}
