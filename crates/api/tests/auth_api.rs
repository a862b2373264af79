//! Registration, login and role enforcement over HTTP.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, expect_json, get, get_auth, post_json, post_json_auth, register_and_login,
    registration, PASSWORD,
};

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_returns_201_without_password_hash() {
    let app = common::build_test_app();
    let response = post_json(
        &app,
        "/api/v1/auth/register",
        registration("Ana Silva", "ana@example.com", "USER"),
    )
    .await;

    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["email"], "ana@example.com");
    assert_eq!(json["data"]["role"], "USER");
    assert!(json["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn unknown_role_registers_a_user() {
    let app = common::build_test_app();
    let response = post_json(
        &app,
        "/api/v1/auth/register",
        registration("Ana Silva", "ana@example.com", "SUPERVISOR"),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["role"], "USER");
}

#[tokio::test]
async fn duplicate_email_returns_409_already_exists() {
    let app = common::build_test_app();
    let body = registration("Ana Silva", "ana@example.com", "USER");
    post_json(&app, "/api/v1/auth/register", body.clone()).await;

    let response = post_json(&app, "/api/v1/auth/register", body).await;
    let json = expect_json(response, StatusCode::CONFLICT).await;
    assert_eq!(json["code"], "ALREADY_EXISTS");
}

#[tokio::test]
async fn short_password_returns_400() {
    let app = common::build_test_app();
    let mut body = registration("Ana Silva", "ana@example.com", "USER");
    body["password"] = "12345".into();

    let response = post_json(&app, "/api/v1/auth/register", body).await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn invalid_email_returns_validation_error() {
    let app = common::build_test_app();
    let response = post_json(
        &app,
        "/api/v1/auth/register",
        registration("Ana Silva", "not-an-email", "USER"),
    )
    .await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_returns_token_and_employee() {
    let app = common::build_test_app();
    post_json(
        &app,
        "/api/v1/auth/register",
        registration("Ana Silva", "ana@example.com", "ADMIN"),
    )
    .await;

    let response = post_json(
        &app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "ana@example.com", "password": PASSWORD }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["employee"]["role"], "ADMIN");
}

#[tokio::test]
async fn wrong_password_and_unknown_email_both_return_401() {
    let app = common::build_test_app();
    post_json(
        &app,
        "/api/v1/auth/register",
        registration("Ana Silva", "ana@example.com", "USER"),
    )
    .await;

    for (email, password) in [("ana@example.com", "wrong-pass"), ("ghost@example.com", PASSWORD)] {
        let response = post_json(
            &app,
            "/api/v1/auth/login",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await;
        let json = expect_json(response, StatusCode::UNAUTHORIZED).await;
        assert_eq!(json["error"], "Invalid email or password");
    }
}

// ---------------------------------------------------------------------------
// Token and role enforcement
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_or_garbage_token_returns_401() {
    let app = common::build_test_app();

    let response = get(&app, "/api/v1/assets").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(&app, "/api/v1/assets", "not-a-jwt").await;
    let json = expect_json(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn user_cannot_reach_admin_routes() {
    let app = common::build_test_app();
    let (_, user) = register_and_login(&app, "user@example.com", "USER").await;

    let response = post_json_auth(
        &app,
        "/api/v1/categories",
        &user,
        serde_json::json!({ "name": "Laptops" }),
    )
    .await;
    let json = expect_json(response, StatusCode::FORBIDDEN).await;
    assert_eq!(json["code"], "FORBIDDEN");

    let response = get_auth(&app, "/api/v1/employees", &user).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn employees_see_only_their_own_profile() {
    let app = common::build_test_app();
    let (admin_id, admin) = register_and_login(&app, "admin@example.com", "ADMIN").await;
    let (user_id, user) = register_and_login(&app, "user@example.com", "USER").await;

    let response = get_auth(&app, &format!("/api/v1/employees/{user_id}"), &user).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(&app, &format!("/api/v1/employees/{admin_id}"), &user).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(&app, &format!("/api/v1/employees/{user_id}"), &admin).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "user@example.com");
}
