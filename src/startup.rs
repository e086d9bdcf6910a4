use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::SqlitePool;
use std::net::TcpListener;

use crate::auth::hash_password;
use crate::configuration::{AuthSettings, DefaultAdminSettings};
use crate::db::users;
use crate::error::AppError;
use crate::logger::RequestLogger;
use crate::middleware::AuthGate;
use crate::routes::{
    create_collection_for_current_user, create_item_for_current_user, create_item_for_user,
    create_project_for_current_user, create_user, create_workflow_for_current_user, delete_user,
    get_user, health_check, list_collections, list_items, list_projects, list_users,
    list_workflows, login_for_access_token, update_user, update_user_password, whoami,
};

pub fn run(
    listener: TcpListener,
    connection: SqlitePool,
    auth_settings: AuthSettings,
) -> Result<Server, std::io::Error> {
    let connection = web::Data::new(connection);
    let auth_settings = web::Data::new(auth_settings);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestLogger)
            // Shared state
            .app_data(connection.clone())
            .app_data(auth_settings.clone())
            // Public routes
            .route("/health_check", web::get().to(health_check))
            .route("/token", web::post().to(login_for_access_token))
            .service(
                web::resource("/users/")
                    .route(web::post().to(create_user))
                    .route(web::get().to(list_users)),
            )
            .service(
                web::resource("/users/{user_id}")
                    .route(web::get().to(get_user))
                    .route(web::put().to(update_user).wrap(AuthGate::active_only()))
                    .route(web::delete().to(delete_user).wrap(AuthGate::active_only())),
            )
            .route(
                "/users/{user_id}/password",
                web::put()
                    .to(update_user_password)
                    .wrap(AuthGate::active_only()),
            )
            .route("/users/{user_id}/items/", web::post().to(create_item_for_user))
            .route("/items/", web::get().to(list_items))
            .route("/nosql_collections/", web::get().to(list_collections))
            // Routes acting as the token holder; gated per route so unknown paths 404
            .service(
                web::scope("/user")
                    .route(
                        "/item/",
                        web::post()
                            .to(create_item_for_current_user)
                            .wrap(AuthGate::active_only()),
                    )
                    .route(
                        "/nosql_collections/",
                        web::post()
                            .to(create_collection_for_current_user)
                            .wrap(AuthGate::active_only()),
                    )
                    .route(
                        "/projects/",
                        web::post()
                            .to(create_project_for_current_user)
                            .wrap(AuthGate::active_only()),
                    )
                    .route(
                        "/workflows/",
                        web::post()
                            .to(create_workflow_for_current_user)
                            .wrap(AuthGate::active_only()),
                    ),
            )
            .route(
                "/projects/",
                web::get().to(list_projects).wrap(AuthGate::active_only()),
            )
            .route(
                "/workflows/",
                web::get().to(list_workflows).wrap(AuthGate::active_only()),
            )
            .route("/whoami/", web::get().to(whoami).wrap(AuthGate::active_only()))
    })
    .listen(listener)?
    .run();

    Ok(server)
}

/// Creates the configured admin account unless a user with that name exists.
///
/// Returns whether an account was created.
pub async fn ensure_default_admin(
    pool: &SqlitePool,
    admin: &DefaultAdminSettings,
    bcrypt_cost: u32,
) -> Result<bool, AppError> {
    if users::find_by_username(pool, &admin.username).await?.is_some() {
        tracing::debug!(username = %admin.username, "Default admin already present");
        return Ok(false);
    }

    let hashed_password = hash_password(&admin.password, bcrypt_cost)?;
    users::create(
        pool,
        users::NewUserRecord {
            email: &admin.email,
            username: &admin.username,
            full_name: None,
            location: None,
            organization: admin.organization.as_deref(),
            hashed_password: &hashed_password,
        },
    )
    .await?;

    tracing::info!(username = %admin.username, "Default admin account created");
    Ok(true)
}
