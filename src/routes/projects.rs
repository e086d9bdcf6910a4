use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::db::projects;
use crate::error::AppError;
use crate::models::{NewProject, User};
use crate::routes::Pagination;

/// POST /user/projects/
pub async fn create_project_for_current_user(
    body: web::Json<NewProject>,
    current_user: web::ReqData<User>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let project = projects::create_for_owner(pool.get_ref(), &body, current_user.id).await?;

    tracing::info!(project_id = project.id, owner_id = project.owner_id, "Project created");
    Ok(HttpResponse::Ok().json(project))
}

/// GET /projects/ (gated, but lists every user's projects)
pub async fn list_projects(
    query: web::Query<Pagination>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let (skip, limit) = query.bounds();
    let projects = projects::list(pool.get_ref(), skip, limit).await?;
    Ok(HttpResponse::Ok().json(projects))
}
