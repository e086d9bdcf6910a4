//! Integration tests for token issuance and the auth gate

mod common;

use chrono::Duration;
use common::{assert_not_authenticated, spawn_app, ADMIN_PASSWORD, ADMIN_USERNAME};
use jsonwebtoken::{encode, EncodingKey, Header};
use resource_api::auth::{issue_access_token, Claims};
use resource_api::configuration::AuthSettings;
use serde_json::Value;

#[tokio::test]
async fn login_returns_bearer_token_for_valid_credentials() {
    let app = spawn_app().await;
    app.register("alice", "wonderland").await;

    let response = app.login("alice", "wonderland").await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["token_type"], "bearer");
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn issued_token_identifies_the_logged_in_user() {
    let app = spawn_app().await;
    let registered = app.register("alice", "wonderland").await;
    let token = app.token_for("alice", "wonderland").await;

    let response = app.get_with_token("/whoami/", &token).await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], registered["id"]);
    assert_eq!(body["username"], "alice");
    assert!(body.get("hashed_password").is_none());
}

#[tokio::test]
async fn default_admin_can_log_in() {
    let app = spawn_app().await;

    let token = app.token_for(ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let response = app.get_with_token("/whoami/", &token).await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["username"], ADMIN_USERNAME);
}

#[tokio::test]
async fn wrong_password_and_unknown_user_are_indistinguishable() {
    let app = spawn_app().await;
    app.register("alice", "wonderland").await;

    let mut bodies = Vec::new();
    for (username, password) in [("alice", "looking-glass"), ("nobody", "wonderland")] {
        let response = app.login(username, password).await;
        assert_eq!(401, response.status().as_u16());
        assert_eq!(
            response
                .headers()
                .get("WWW-Authenticate")
                .and_then(|h| h.to_str().ok()),
            Some("Bearer")
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Incorrect username or password");
        bodies.push((body["code"].clone(), body["status"].clone()));
    }

    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn login_returns_400_when_form_fields_are_missing() {
    let app = spawn_app().await;

    let test_cases = vec![
        (vec![("username", "alice")], "missing password"),
        (vec![("password", "wonderland")], "missing username"),
        (vec![], "missing both"),
    ];

    for (form, description) in test_cases {
        let response = app
            .api_client
            .post(app.url("/token"))
            .form(&form)
            .send()
            .await
            .expect("Failed to execute request.");

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
    }
}

#[tokio::test]
async fn protected_route_without_token_returns_401() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(app.url("/whoami/"))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_not_authenticated(response).await;
}

#[tokio::test]
async fn malformed_authorization_headers_return_401() {
    let app = spawn_app().await;

    for header in ["Bearer", "Bearer ", "Basic YWxpY2U6d29uZGVybGFuZA==", "Bearer not.a.jwt"] {
        let response = app
            .api_client
            .get(app.url("/whoami/"))
            .header("Authorization", header)
            .send()
            .await
            .expect("Failed to execute request.");

        assert_eq!(401, response.status().as_u16(), "accepted {:?}", header);
        assert_not_authenticated(response).await;
    }
}

#[tokio::test]
async fn expired_token_returns_401() {
    let app = spawn_app().await;
    app.register("alice", "wonderland").await;

    let token = issue_access_token("alice", Some(Duration::minutes(-1)), &app.auth).unwrap();
    let response = app.get_with_token("/whoami/", &token).await;

    assert_not_authenticated(response).await;
}

#[tokio::test]
async fn token_signed_with_another_secret_returns_401() {
    let app = spawn_app().await;
    app.register("alice", "wonderland").await;

    let other = AuthSettings {
        secret_key: "some-other-secret-key-0123456789abcdef".to_string(),
        ..app.auth.clone()
    };
    let token = issue_access_token("alice", None, &other).unwrap();
    let response = app.get_with_token("/whoami/", &token).await;

    assert_not_authenticated(response).await;
}

#[tokio::test]
async fn token_without_subject_returns_401() {
    let app = spawn_app().await;

    let mut claims = Claims::new("alice", Duration::minutes(5));
    claims.sub = None;
    let token = encode(
        &Header::new(app.auth.algorithm),
        &claims,
        &EncodingKey::from_secret(app.auth.secret_key.as_bytes()),
    )
    .unwrap();
    let response = app.get_with_token("/whoami/", &token).await;

    assert_not_authenticated(response).await;
}

#[tokio::test]
async fn token_for_unknown_subject_returns_401() {
    let app = spawn_app().await;

    let token = issue_access_token("ghost", None, &app.auth).unwrap();
    let response = app.get_with_token("/whoami/", &token).await;

    assert_not_authenticated(response).await;
}

#[tokio::test]
async fn token_stops_working_once_its_user_is_deleted() {
    let app = spawn_app().await;
    let bob = app.register("bob", "builder-pass").await;
    let bob_token = app.token_for("bob", "builder-pass").await;
    let admin_token = app.token_for(ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = app
        .api_client
        .delete(app.url(&format!("/users/{}", bob["id"])))
        .bearer_auth(&admin_token)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let response = app.get_with_token("/whoami/", &bob_token).await;
    assert_not_authenticated(response).await;
}

#[tokio::test]
async fn inactive_user_is_rejected_with_400() {
    let app = spawn_app().await;
    app.register("alice", "wonderland").await;
    let token = app.token_for("alice", "wonderland").await;
    app.set_active("alice", false).await;

    let response = app.get_with_token("/whoami/", &token).await;

    assert_eq!(400, response.status().as_u16());
    assert!(response.headers().get("WWW-Authenticate").is_none());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Inactive user");
}

#[tokio::test]
async fn inactive_user_can_still_obtain_a_token() {
    let app = spawn_app().await;
    app.register("alice", "wonderland").await;
    app.set_active("alice", false).await;

    let response = app.login("alice", "wonderland").await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn scoped_routes_are_gated() {
    let app = spawn_app().await;

    for path in ["/user/item/", "/user/nosql_collections/", "/user/projects/", "/user/workflows/"] {
        let response = app
            .api_client
            .post(app.url(path))
            .json(&serde_json::json!({"name": "x", "title": "x", "project_id": 1}))
            .send()
            .await
            .expect("Failed to execute request.");

        assert_eq!(401, response.status().as_u16(), "{} was reachable", path);
    }
}

#[tokio::test]
async fn unknown_path_under_user_scope_is_not_found() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(app.url("/user/unknown/"))
        .json(&serde_json::json!({"name": "x"}))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(404, response.status().as_u16());
    assert!(response.headers().get("WWW-Authenticate").is_none());
}
