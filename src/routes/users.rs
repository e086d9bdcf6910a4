/// User account routes
///
/// Registration and reads are public. Updates, deletion, password changes
/// and `whoami` sit behind `AuthGate::active_only()` and receive the caller
/// as `web::ReqData<User>`.

use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::auth::{hash_password, verify_password};
use crate::configuration::AuthSettings;
use crate::db::{collections, items, projects, users};
use crate::error::{AppError, AuthError, DatabaseError, ErrorContext};
use crate::models::{NewUser, PasswordUpdate, User, UserResponse, UserUpdate};
use crate::routes::Pagination;
use crate::validators::{
    is_valid_email, is_valid_new_password, is_valid_password, is_valid_username,
};

/// Loads everything the user owns into the public representation
pub(crate) async fn user_response(pool: &SqlitePool, user: User) -> Result<UserResponse, AppError> {
    let items = items::list_for_owner(pool, user.id).await?;
    let nosql_collections = collections::list_for_owner(pool, user.id).await?;
    let projects = projects::list_for_owner(pool, user.id).await?;
    Ok(UserResponse::new(user, items, nosql_collections, projects))
}

/// POST /users/
///
/// # Errors
/// - 400: Invalid fields, or username already registered
pub async fn create_user(
    body: web::Json<NewUser>,
    pool: web::Data<SqlitePool>,
    auth: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_registration");

    let username = is_valid_username(&body.username)?;
    let email = is_valid_email(&body.email)?;
    is_valid_password(&body.password)?;

    if users::find_by_username(pool.get_ref(), &username).await?.is_some() {
        tracing::info!(
            request_id = %context.request_id,
            operation = %context.operation,
            "Username already registered"
        );
        return Err(DatabaseError::UniqueConstraintViolation(
            "Username already registered".to_string(),
        )
        .into());
    }

    let hashed_password = hash_password(&body.password, auth.bcrypt_cost)?;
    let user = users::create(
        pool.get_ref(),
        users::NewUserRecord {
            email: &email,
            username: &username,
            full_name: body.full_name.as_deref(),
            location: body.location.as_deref(),
            organization: body.organization.as_deref(),
            hashed_password: &hashed_password,
        },
    )
    .await?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        user_id = user.id,
        "User registered"
    );

    Ok(HttpResponse::Ok().json(UserResponse::new(user, vec![], vec![], vec![])))
}

/// GET /users/
pub async fn list_users(
    query: web::Query<Pagination>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let (skip, limit) = query.bounds();
    let rows = users::list(pool.get_ref(), skip, limit).await?;

    let mut response = Vec::with_capacity(rows.len());
    for user in rows {
        response.push(user_response(pool.get_ref(), user).await?);
    }

    Ok(HttpResponse::Ok().json(response))
}

/// GET /users/{user_id}
pub async fn get_user(
    path: web::Path<i64>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let user = users::find_by_id(pool.get_ref(), path.into_inner())
        .await?
        .ok_or(DatabaseError::NotFound("User"))?;

    Ok(HttpResponse::Ok().json(user_response(pool.get_ref(), user).await?))
}

/// PUT /users/{user_id}
///
/// Any active user may edit any profile.
///
/// # Errors
/// - 400: Invalid fields, or the new username is taken
/// - 404: No such user
pub async fn update_user(
    path: web::Path<i64>,
    body: web::Json<UserUpdate>,
    current_user: web::ReqData<User>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_update").with_user_id(current_user.id);
    let user_id = path.into_inner();

    let mut update = body.into_inner();
    if let Some(username) = &update.username {
        update.username = Some(is_valid_username(username)?);
    }
    if let Some(email) = &update.email {
        update.email = Some(is_valid_email(email)?);
    }

    let user = users::update_fields(pool.get_ref(), user_id, &update)
        .await?
        .ok_or(DatabaseError::NotFound("User"))?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        acting_user = ?context.user_id,
        user_id = user.id,
        "User updated"
    );

    Ok(HttpResponse::Ok().json(user_response(pool.get_ref(), user).await?))
}

/// DELETE /users/{user_id}
///
/// Returns the user as it was, including what it owned; owned rows are
/// removed along with it.
pub async fn delete_user(
    path: web::Path<i64>,
    current_user: web::ReqData<User>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_deletion").with_user_id(current_user.id);
    let user_id = path.into_inner();

    let user = users::find_by_id(pool.get_ref(), user_id)
        .await?
        .ok_or(DatabaseError::NotFound("User"))?;
    let snapshot = user_response(pool.get_ref(), user).await?;

    users::delete(pool.get_ref(), user_id)
        .await?
        .ok_or(DatabaseError::NotFound("User"))?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        acting_user = ?context.user_id,
        user_id = user_id,
        "User deleted"
    );

    Ok(HttpResponse::Ok().json(snapshot))
}

/// PUT /users/{user_id}/password
///
/// Only the account owner may change its password, and only by proving
/// the current one.
///
/// # Errors
/// - 400: Wrong old password, or new password shorter than 8 characters
/// - 403: `user_id` names another user
/// - 404: No such user, checked before ownership
pub async fn update_user_password(
    path: web::Path<i64>,
    body: web::Json<PasswordUpdate>,
    current_user: web::ReqData<User>,
    pool: web::Data<SqlitePool>,
    auth: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let current_user = current_user.into_inner();
    let context = ErrorContext::new("password_change").with_user_id(current_user.id);
    let user_id = path.into_inner();

    let target = users::find_by_id(pool.get_ref(), user_id)
        .await?
        .ok_or(DatabaseError::NotFound("User"))?;
    if target.id != current_user.id {
        return Err(AuthError::NotOwner.into());
    }

    if !verify_password(&body.old_password, &target.hashed_password) {
        return Err(AuthError::IncorrectPassword.into());
    }
    is_valid_new_password(&body.new_password)?;

    let hashed_password = hash_password(&body.new_password, auth.bcrypt_cost)?;
    let user = users::update_password(pool.get_ref(), user_id, &hashed_password)
        .await?
        .ok_or(DatabaseError::NotFound("User"))?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        user_id = user.id,
        "Password changed"
    );

    Ok(HttpResponse::Ok().json(user_response(pool.get_ref(), user).await?))
}

/// GET /whoami/
pub async fn whoami(
    current_user: web::ReqData<User>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let user = current_user.into_inner();
    Ok(HttpResponse::Ok().json(user_response(pool.get_ref(), user).await?))
}
