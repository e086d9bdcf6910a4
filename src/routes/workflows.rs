use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::db::{projects, workflows};
use crate::error::{AppError, DatabaseError};
use crate::models::{NewWorkflow, User};
use crate::routes::Pagination;

/// POST /user/workflows/
///
/// # Errors
/// - 400: The project already has a workflow with this name
/// - 404: `project_id` does not exist
pub async fn create_workflow_for_current_user(
    body: web::Json<NewWorkflow>,
    current_user: web::ReqData<User>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let project = projects::find_by_id(pool.get_ref(), body.project_id)
        .await?
        .ok_or(DatabaseError::NotFound("Project"))?;

    if workflows::find_in_project_by_name(pool.get_ref(), project.id, &body.name)
        .await?
        .is_some()
    {
        return Err(DatabaseError::UniqueConstraintViolation(format!(
            "Workflow '{}' already exists in project {}",
            body.name, project.id
        ))
        .into());
    }

    let workflow = workflows::create_for_owner(pool.get_ref(), &body, current_user.id).await?;

    tracing::info!(
        workflow_id = workflow.id,
        project_id = project.id,
        owner_id = workflow.owner_id,
        "Workflow created"
    );
    Ok(HttpResponse::Ok().json(workflow))
}

/// GET /workflows/
pub async fn list_workflows(
    query: web::Query<Pagination>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let (skip, limit) = query.bounds();
    let workflows = workflows::list(pool.get_ref(), skip, limit).await?;
    Ok(HttpResponse::Ok().json(workflows))
}
