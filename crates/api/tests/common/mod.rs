#![allow(dead_code)]

use std::sync::Arc;

use ams_api::auth::jwt::JwtConfig;
use ams_api::config::ServerConfig;
use ams_api::router::build_app_router;
use ams_api::state::AppState;
use ams_db::MemoryStore;
use ams_engine::WorkflowConfig;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const PASSWORD: &str = "s3cret-pass";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_max_connections: 1,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        workflow: WorkflowConfig::default(),
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// Clones of the returned router share the store, so a test can issue
/// several requests against the same state.
pub fn build_test_app() -> Router {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> Router {
    let state = AppState {
        store: Arc::new(MemoryStore::new()),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn put_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), None).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the parsed body.
pub async fn expect_json(response: Response, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn registration(name: &str, email: &str, role: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "gender": "Female",
        "contact_number": "5550100",
        "address": "1 Main St",
        "email": email,
        "password": PASSWORD,
        "role": role,
    })
}

/// Register an employee and log them in. Returns `(employee_id, token)`.
pub async fn register_and_login(app: &Router, email: &str, role: &str) -> (i64, String) {
    let response = post_json(
        app,
        "/api/v1/auth/register",
        registration("Test Employee", email, role),
    )
    .await;
    let created = expect_json(response, StatusCode::CREATED).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": email, "password": PASSWORD }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    (id, json["access_token"].as_str().unwrap().to_string())
}

pub fn asset_body(name: &str, category: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "category": category,
        "model": "2024",
        "manufacturing_date": "2024-01-15",
        "expiry_date": "2029-01-15",
        "value": 1299.0,
        "description": "Issued with charger",
    })
}

/// Create an asset as `admin_token`, returning its id.
pub async fn create_asset(app: &Router, admin_token: &str, name: &str, category: &str) -> i64 {
    let response = post_json_auth(app, "/api/v1/assets", admin_token, asset_body(name, category)).await;
    let json = expect_json(response, StatusCode::CREATED).await;
    json["data"]["id"].as_i64().unwrap()
}
