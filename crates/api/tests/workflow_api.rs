//! Catalog, borrowing, audit and service-request flows over HTTP.

mod common;

use axum::http::StatusCode;
use common::{
    create_asset, delete_auth, expect_json, get_auth, post_json_auth, put_auth, put_json_auth,
    register_and_login,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[tokio::test]
async fn category_delete_blocked_until_assets_removed() {
    let app = common::build_test_app();
    let (_, admin) = register_and_login(&app, "admin@example.com", "ADMIN").await;

    let response = post_json_auth(&app, "/api/v1/categories", &admin, json!({ "name": "Laptops" })).await;
    let category = expect_json(response, StatusCode::CREATED).await;
    let category_id = category["data"]["id"].as_i64().unwrap();

    let mut assets = Vec::new();
    for name in ["MacBook Air", "ThinkPad X1", "XPS 13"] {
        assets.push(create_asset(&app, &admin, name, "Laptops").await);
    }

    let response = get_auth(&app, "/api/v1/assets/category/Laptops", &admin).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    let uri = format!("/api/v1/categories/{category_id}");
    let response = delete_auth(&app, &uri, &admin).await;
    let json = expect_json(response, StatusCode::CONFLICT).await;
    assert_eq!(json["code"], "CONFLICT");

    for id in assets {
        let response = delete_auth(&app, &format!("/api/v1/assets/{id}"), &admin).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
    let response = delete_auth(&app, &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn asset_lookups_and_validation() {
    let app = common::build_test_app();
    let (_, admin) = register_and_login(&app, "admin@example.com", "ADMIN").await;
    let id = create_asset(&app, &admin, "Pixel 8", "Phones").await;

    let response = get_auth(&app, &format!("/api/v1/assets/{id}"), &admin).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["status"], "Available");
    assert!(json["data"]["image_path"].is_null());

    let response = get_auth(&app, "/api/v1/assets?name=Pixel%208", &admin).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = get_auth(&app, "/api/v1/assets?name=Stapler", &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(&app, "/api/v1/categories/by-name/Phones", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);

    let mut bad = common::asset_body("Projector", "AV");
    bad["value"] = json!(-5.0);
    let response = post_json_auth(&app, "/api/v1/assets", &admin, bad).await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let response = post_json_auth(&app, "/api/v1/assets", &admin, common::asset_body("  ", "  ")).await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn asset_update_cannot_set_borrowed() {
    let app = common::build_test_app();
    let (_, admin) = register_and_login(&app, "admin@example.com", "ADMIN").await;
    let id = create_asset(&app, &admin, "Pixel 8", "Phones").await;

    let mut body = common::asset_body("Pixel 8 Pro", "Phones");
    body["status"] = json!("Borrowed");
    let response = put_json_auth(&app, &format!("/api/v1/assets/{id}"), &admin, body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = common::asset_body("Pixel 8 Pro", "Phones");
    let response = put_json_auth(&app, &format!("/api/v1/assets/{id}"), &admin, body).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["name"], "Pixel 8 Pro");
}

// ---------------------------------------------------------------------------
// Borrowing lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn borrow_approve_service_return_flow() {
    let app = common::build_test_app();
    let (_, admin) = register_and_login(&app, "admin@example.com", "ADMIN").await;
    let (employee_id, user) = register_and_login(&app, "user@example.com", "USER").await;
    let asset_id = create_asset(&app, &admin, "MacBook Air", "Laptops").await;

    // Request.
    let response = post_json_auth(&app, "/api/v1/borrowings", &user, json!({ "asset_id": asset_id })).await;
    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["status"], "PENDING");
    assert_eq!(json["data"]["employee_id"], employee_id);
    let borrowing_id = json["data"]["id"].as_i64().unwrap();

    // Duplicate request.
    let response = post_json_auth(&app, "/api/v1/borrowings", &user, json!({ "asset_id": asset_id })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Only admins decide.
    let action_uri = format!("/api/v1/borrowings/{borrowing_id}/action");
    let response = put_json_auth(&app, &action_uri, &user, json!({ "action": "APPROVE" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(&app, &action_uri, &admin, json!({ "action": "LEND" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(&app, &action_uri, &admin, json!({ "action": "approve" })).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["status"], "ACTIVE");

    let response = get_auth(&app, &format!("/api/v1/assets/{asset_id}"), &user).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["status"], "Borrowed");

    let response = get_auth(&app, &format!("/api/v1/employees/{employee_id}/assets"), &user).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"][0]["id"], asset_id);

    // Service request while holding.
    let response = post_json_auth(
        &app,
        "/api/v1/service-requests",
        &user,
        json!({
            "asset_id": asset_id,
            "issue_type": "HARDWARE",
            "description": "Battery drains in an hour",
        }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["status"], "Pending");
    let ticket_id = json["data"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        &app,
        &format!("/api/v1/service-requests/{ticket_id}/status"),
        &admin,
        json!({ "status": "Transit" }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["status"], "Transit");

    let response = get_auth(&app, "/api/v1/service-requests/status/transit", &admin).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    // Return, then return again.
    let return_uri = format!("/api/v1/borrowings/{borrowing_id}/return");
    let response = put_auth(&app, &return_uri, &user).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["status"], "RETURNED");
    assert!(json["data"]["returned_at"].is_string());

    let response = put_auth(&app, &return_uri, &user).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = get_auth(&app, &format!("/api/v1/assets/{asset_id}"), &user).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["status"], "Available");

    let response = get_auth(&app, "/api/v1/borrowings/returned", &admin).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn only_borrower_or_admin_can_return() {
    let app = common::build_test_app();
    let (_, admin) = register_and_login(&app, "admin@example.com", "ADMIN").await;
    let (_, owner) = register_and_login(&app, "owner@example.com", "USER").await;
    let (_, other) = register_and_login(&app, "other@example.com", "USER").await;
    let asset_id = create_asset(&app, &admin, "MacBook Air", "Laptops").await;

    let response = post_json_auth(&app, "/api/v1/borrowings", &owner, json!({ "asset_id": asset_id })).await;
    let borrowing_id = expect_json(response, StatusCode::CREATED).await["data"]["id"]
        .as_i64()
        .unwrap();
    put_json_auth(
        &app,
        &format!("/api/v1/borrowings/{borrowing_id}/action"),
        &admin,
        json!({ "action": "APPROVE" }),
    )
    .await;

    let return_uri = format!("/api/v1/borrowings/{borrowing_id}/return");
    let response = put_auth(&app, &return_uri, &other).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_auth(&app, &return_uri, &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn service_request_without_custody_is_conflict() {
    let app = common::build_test_app();
    let (_, admin) = register_and_login(&app, "admin@example.com", "ADMIN").await;
    let (_, user) = register_and_login(&app, "user@example.com", "USER").await;
    let asset_id = create_asset(&app, &admin, "MacBook Air", "Laptops").await;

    let response = post_json_auth(
        &app,
        "/api/v1/service-requests",
        &user,
        json!({ "asset_id": asset_id, "issue_type": "SOFTWARE", "description": "Won't boot" }),
    )
    .await;
    let json = expect_json(response, StatusCode::CONFLICT).await;
    assert_eq!(json["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Audits
// ---------------------------------------------------------------------------

#[tokio::test]
async fn audit_decision_is_reserved_for_the_addressee() {
    let app = common::build_test_app();
    let (_, admin) = register_and_login(&app, "admin@example.com", "ADMIN").await;
    let (addressee_id, addressee) = register_and_login(&app, "user@example.com", "USER").await;
    let (_, intruder) = register_and_login(&app, "intruder@example.com", "USER").await;
    let asset_id = create_asset(&app, &admin, "MacBook Air", "Laptops").await;

    let response = post_json_auth(
        &app,
        "/api/v1/audits",
        &admin,
        json!({ "employee_id": addressee_id, "asset_id": asset_id }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["status"], "PENDING");
    let audit_id = json["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/audits/{audit_id}/decision");

    // Invalid action from the wrong caller still reports 401.
    let response = put_json_auth(&app, &uri, &intruder, json!({ "action": "DANCE" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = put_json_auth(&app, &uri, &addressee, json!({ "action": "DANCE" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(&app, &uri, &addressee, json!({ "action": "VERIFY" })).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["status"], "VERIFIED");

    let response = put_json_auth(&app, &uri, &addressee, json!({ "action": "REJECT" })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = get_auth(&app, &format!("/api/v1/employees/{addressee_id}/audits"), &addressee).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}
