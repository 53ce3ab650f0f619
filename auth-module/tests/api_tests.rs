mod common;

use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_ping() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/auth/ping")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "message": "pong" }));
}

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app.register("a@b.com", "secret1").await;

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "status": "ok" }));
    assert_eq!(app.count_users("a@b.com").await, 1);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;

    let first = app.register("a@b.com", "secret1").await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.register("a@b.com", "secret1").await;
    assert_eq!(second.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = second.json().await.expect("Failed to parse response");
    assert_eq!(body["detail"], "User already exists");
    assert_eq!(app.count_users("a@b.com").await, 1);
}

#[tokio::test]
async fn test_register_short_password_stores_nothing() {
    let app = TestApp::spawn().await;

    let response = app.register("a@b.com", "12345").await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"][0]["field"], "password");
    assert_eq!(
        body["errors"][0]["message"],
        "ensure this value has at least 6 characters"
    );
    assert_eq!(app.count_users("a@b.com").await, 0);
}

#[tokio::test]
async fn test_register_invalid_email() {
    let app = TestApp::spawn().await;

    let response = app.register("not-an-email", "secret1").await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"][0]["field"], "email");
}

#[tokio::test]
async fn test_register_missing_field() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/register")
        .json(&json!({ "email": "a@b.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["errors"],
        json!([{ "field": "password", "message": "field required" }])
    );
}

#[tokio::test]
async fn test_register_wrong_field_type() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/register")
        .json(&json!({ "email": "a@b.com", "password": 123456 }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_register_non_json_body() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/register")
        .header("Content-Type", "text/plain")
        .body("email=a@b.com&password=secret1")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_register_malformed_json() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/register")
        .header("Content-Type", "application/json")
        .body(r#"{"email": "a@b.com", "password": "#)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.count_users("a@b.com").await, 0);
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;
    app.register("a@b.com", "secret1").await;

    let response = app.login("a@b.com", "secret1").await;

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["token_type"], "bearer");

    let token = body["access_token"].as_str().expect("Missing access token");
    let claims = app
        .authenticator
        .validate_token(token)
        .expect("Issued token does not verify");

    assert_eq!(claims.email().as_deref(), Some("a@b.com"));
    assert_eq!(claims.exp, body["expires_at"].as_i64());

    let user_id: i64 = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
        .bind("a@b.com")
        .fetch_one(&app.pool)
        .await
        .expect("Failed to read user id");
    assert_eq!(claims.sub, Some(user_id.to_string()));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.register("a@b.com", "secret1").await;

    let wrong_password = app.login("a@b.com", "wrong").await;
    let unknown_user = app.login("nobody@b.com", "secret1").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let wrong_password: serde_json::Value = wrong_password.json().await.unwrap();
    let unknown_user: serde_json::Value = unknown_user.json().await.unwrap();
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password["detail"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_missing_field() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/login")
        .json(&json!({ "password": "secret1" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_protected_route_with_token() {
    let app = TestApp::spawn().await;
    app.register("a@b.com", "secret1").await;

    let login: serde_json::Value = app.login("a@b.com", "secret1").await.json().await.unwrap();
    let token = login["access_token"].as_str().unwrap();

    let response = app
        .get_authenticated("/me", token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["email"], "a@b.com");
    assert!(body["id"].is_i64());
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/me")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_garbage_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get_authenticated("/me", "not.a.token")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Invalid or expired token");
}
