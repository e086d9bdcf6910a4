/// Credential check for the token endpoint
///
/// Unknown usernames and wrong passwords end in the same
/// `InvalidCredentials`, so callers cannot probe which accounts exist. A
/// lookup miss still runs a bcrypt verification at `bcrypt_cost` so that
/// both failures take about as long.

use sqlx::SqlitePool;

use crate::auth::password::{dummy_hash, verify_password};
use crate::db::users;
use crate::error::{AppError, AuthError};
use crate::models::User;

pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    bcrypt_cost: u32,
) -> Result<User, AppError> {
    let Some(user) = users::find_by_username(pool, username).await? else {
        verify_password(password, &dummy_hash(bcrypt_cost)?);
        tracing::debug!("Login attempt for unknown username");
        return Err(AuthError::InvalidCredentials.into());
    };

    if !verify_password(password, &user.hashed_password) {
        tracing::debug!(user_id = user.id, "Login attempt with wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    Ok(user)
}
