use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::db::collections;
use crate::error::AppError;
use crate::models::{NewNoSqlCollection, User};
use crate::routes::Pagination;

/// POST /user/nosql_collections/
pub async fn create_collection_for_current_user(
    body: web::Json<NewNoSqlCollection>,
    current_user: web::ReqData<User>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let collection =
        collections::create_for_owner(pool.get_ref(), &body, current_user.id).await?;
    Ok(HttpResponse::Ok().json(collection))
}

/// GET /nosql_collections/
pub async fn list_collections(
    query: web::Query<Pagination>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let (skip, limit) = query.bounds();
    let collections = collections::list(pool.get_ref(), skip, limit).await?;
    Ok(HttpResponse::Ok().json(collections))
}
