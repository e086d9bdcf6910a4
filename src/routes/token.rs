/// Token endpoint
///
/// OAuth2 password-flow style: form-encoded credentials in, bearer token out.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::auth::{authenticate, issue_access_token};
use crate::configuration::AuthSettings;
use crate::error::{AppError, ErrorContext};

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /token
///
/// # Errors
/// - 400: Form fields missing
/// - 401: Unknown username or wrong password (same response for both)
pub async fn login_for_access_token(
    form: web::Form<LoginForm>,
    pool: web::Data<SqlitePool>,
    auth: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("login");

    let user = authenticate(
        pool.get_ref(),
        &form.username,
        &form.password,
        auth.bcrypt_cost,
    )
    .await?;
    let access_token =
        issue_access_token(&user.username, Some(auth.access_token_ttl()), auth.get_ref())?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        user_id = user.id,
        "Access token issued"
    );

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
