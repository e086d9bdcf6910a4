/// Bearer-token gate for protected routes
///
/// Verifies the access token, loads the user it names and injects the
/// `User` into request extensions, where handlers pick it up with
/// `web::ReqData<User>`.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use sqlx::SqlitePool;
use std::rc::Rc;

use crate::auth::verify_access_token;
use crate::configuration::AuthSettings;
use crate::db::users;
use crate::error::{AppError, AuthError, ConfigError};
use crate::models::User;

/// Route middleware requiring a valid bearer token.
///
/// `active_only` additionally refuses deactivated accounts with
/// 400 "Inactive user" instead of the usual 401.
#[derive(Clone, Copy, Debug)]
pub struct AuthGate {
    require_active: bool,
}

impl AuthGate {
    pub fn authenticated() -> Self {
        Self {
            require_active: false,
        }
    }

    pub fn active_only() -> Self {
        Self {
            require_active: true,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGateService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(AuthGateService {
            service: Rc::new(service),
            require_active: self.require_active,
        }))
    }
}

pub struct AuthGateService<S> {
    service: Rc<S>,
    require_active: bool,
}

impl<S, B> Service<ServiceRequest> for AuthGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = bearer_token(req.headers()).map(str::to_string);
        let settings = req.app_data::<web::Data<AuthSettings>>().cloned();
        let pool = req.app_data::<web::Data<SqlitePool>>().cloned();
        let require_active = self.require_active;
        let service = self.service.clone();

        Box::pin(async move {
            let (settings, pool) = match (settings, pool) {
                (Some(settings), Some(pool)) => (settings, pool),
                _ => {
                    return Err(Error::from(AppError::Config(ConfigError::MissingRequired(
                        "auth settings or database pool not registered".to_string(),
                    ))))
                }
            };

            let user = resolve_identity(token.as_deref(), &settings, &pool)
                .await
                .map_err(Error::from)?;

            if require_active && !user.is_active {
                tracing::debug!(user_id = user.id, "Rejected inactive user");
                return Err(Error::from(AppError::from(AuthError::IdentityInactive)));
            }

            tracing::debug!(user_id = user.id, "Bearer token accepted");
            req.extensions_mut().insert(user);
            service.call(req).await
        })
    }
}

/// Token → subject → user, collapsing every failure into an `AuthError`
pub async fn resolve_identity(
    token: Option<&str>,
    settings: &AuthSettings,
    pool: &SqlitePool,
) -> Result<User, AppError> {
    let token = token.ok_or(AuthError::MissingToken)?;
    let username = verify_access_token(token, settings)?;

    users::find_by_username(pool, &username)
        .await?
        .ok_or_else(|| AuthError::SubjectUnknown.into())
}

/// Extracts `<token>` from `Authorization: Bearer <token>`
///
/// The scheme is matched case-insensitively, as RFC 7235 asks.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
