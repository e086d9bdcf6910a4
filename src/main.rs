use resource_api::auth::dummy_hash;
use resource_api::configuration::get_configuration;
use resource_api::db;
use resource_api::startup::{ensure_default_admin, run};
use resource_api::telemetry::init_telemetry;
use sqlx::sqlite::SqlitePoolOptions;
use std::net::TcpListener;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry("info");

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    let connect_options = configuration.database.connect_options().map_err(|e| {
        tracing::error!("Invalid database url: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "Database configuration error")
    })?;

    let pool = SqlitePoolOptions::new()
        .max_connections(configuration.database.max_connections)
        .connect_with(connect_options)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create connection pool: {}", e);
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "Database connection error")
        })?;

    db::migrate(&pool).await.map_err(|e| {
        tracing::error!("Failed to run migrations: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, "Database migration error")
    })?;

    // a missing admin account must not keep the service down
    if let Err(e) = ensure_default_admin(
        &pool,
        &configuration.default_admin,
        configuration.auth.bcrypt_cost,
    )
    .await
    {
        tracing::error!(error = %e, "Error creating default admin user");
    }

    // the first login for an unknown username would otherwise pay for hashing too
    if let Err(e) = dummy_hash(configuration.auth.bcrypt_cost) {
        tracing::error!(error = %e, "Failed to prepare login timing hash");
    }

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = run(listener, pool, configuration.auth)?;
    server.await
}
