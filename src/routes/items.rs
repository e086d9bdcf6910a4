use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::db::{items, users};
use crate::error::{AppError, DatabaseError};
use crate::models::{NewItem, User};
use crate::routes::Pagination;

/// POST /users/{user_id}/items/
///
/// Public: the owner is whoever the path names.
pub async fn create_item_for_user(
    path: web::Path<i64>,
    body: web::Json<NewItem>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let owner_id = path.into_inner();
    if users::find_by_id(pool.get_ref(), owner_id).await?.is_none() {
        return Err(DatabaseError::NotFound("User").into());
    }

    let item = items::create_for_owner(pool.get_ref(), &body, owner_id).await?;
    Ok(HttpResponse::Ok().json(item))
}

/// POST /user/item/
pub async fn create_item_for_current_user(
    body: web::Json<NewItem>,
    current_user: web::ReqData<User>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let item = items::create_for_owner(pool.get_ref(), &body, current_user.id).await?;
    Ok(HttpResponse::Ok().json(item))
}

/// GET /items/
pub async fn list_items(
    query: web::Query<Pagination>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let (skip, limit) = query.bounds();
    let items = items::list(pool.get_ref(), skip, limit).await?;
    Ok(HttpResponse::Ok().json(items))
}
