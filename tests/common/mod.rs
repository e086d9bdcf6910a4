#![allow(dead_code)]

use std::net::TcpListener;

use jsonwebtoken::Algorithm;
use reqwest::Response;
use resource_api::configuration::{AuthSettings, DefaultAdminSettings};
use resource_api::db;
use resource_api::startup::{ensure_default_admin, run};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";
/// Cheapest cost bcrypt accepts
pub const TEST_BCRYPT_COST: u32 = 4;

pub struct TestApp {
    pub address: String,
    pub db_pool: SqlitePool,
    pub auth: AuthSettings,
    pub api_client: reqwest::Client,
}

pub async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let db_pool = configure_database().await;
    let auth = AuthSettings {
        secret_key: "integration-test-secret-key-0123456789abcdef".to_string(),
        algorithm: Algorithm::HS256,
        access_token_expire_minutes: 15,
        bcrypt_cost: TEST_BCRYPT_COST,
    };

    let admin = DefaultAdminSettings {
        username: ADMIN_USERNAME.to_string(),
        email: "admin@example.com".to_string(),
        password: ADMIN_PASSWORD.to_string(),
        organization: Some("admin".to_string()),
    };
    ensure_default_admin(&db_pool, &admin, auth.bcrypt_cost)
        .await
        .expect("Failed to seed default admin");

    let server = run(listener, db_pool.clone(), auth.clone()).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool,
        auth,
        api_client: reqwest::Client::new(),
    }
}

pub async fn configure_database() -> SqlitePool {
    // one connection so every query sees the same in-memory database
    let connection_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    db::migrate(&connection_pool)
        .await
        .expect("Failed to migrate the database");
    connection_pool
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_user(&self, body: &Value) -> Response {
        self.api_client
            .post(self.url("/users/"))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Registers `username` and returns the created user as JSON
    pub async fn register(&self, username: &str, password: &str) -> Value {
        let response = self
            .post_user(&serde_json::json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": password,
            }))
            .await;
        assert_eq!(200, response.status().as_u16(), "registration of {} failed", username);
        response.json().await.expect("Failed to parse response")
    }

    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.api_client
            .post(self.url("/token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn token_for(&self, username: &str, password: &str) -> String {
        let response = self.login(username, password).await;
        assert_eq!(200, response.status().as_u16(), "login of {} failed", username);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["access_token"]
            .as_str()
            .expect("No access token in response")
            .to_string()
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> Response {
        self.api_client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn set_active(&self, username: &str, active: bool) {
        sqlx::query("UPDATE users SET is_active = ? WHERE username = ?")
            .bind(active)
            .bind(username)
            .execute(&self.db_pool)
            .await
            .expect("Failed to update user");
    }
}

/// Asserts the uniform 401 every token failure produces
pub async fn assert_not_authenticated(response: Response) {
    assert_eq!(401, response.status().as_u16());
    assert_eq!(
        response
            .headers()
            .get("WWW-Authenticate")
            .and_then(|h| h.to_str().ok()),
        Some("Bearer")
    );
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Could not validate credentials");
    assert_eq!(body["code"], "NOT_AUTHENTICATED");
}
