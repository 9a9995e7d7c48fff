//! Integration tests for the `/api/v1/schemas` endpoints and root health.

mod common;

use axum::http::StatusCode;
use common::{
    build_test_app, expect_json, get, patch_json, post_json, user_schema_body, Reply,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn root_health_reports_ok_without_database() {
    let app = build_test_app(Reply::Users);
    let json = expect_json(get(app.router, "/health").await, StatusCode::OK).await;

    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert!(json["db_healthy"].is_null());
}

#[tokio::test]
async fn service_health_message() {
    let app = build_test_app(Reply::Users);
    let json = expect_json(
        get(app.router, "/api/v1/schemas/health").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"], "TDM Service is running");
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = build_test_app(Reply::Users);
    let response = get(app.router, "/health").await;
    assert!(response.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app(Reply::Users);
    let response = get(app.router, "/api/v1/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_returns_201_with_stored_schema() {
    let app = build_test_app(Reply::Users);
    let json = expect_json(
        post_json(app.router, "/api/v1/schemas", user_schema_body()).await,
        StatusCode::CREATED,
    )
    .await;

    let data = &json["data"];
    assert_eq!(data["name"], "User");
    assert_eq!(data["type"], "NAMED_TYPE");
    assert_eq!(data["active"], true);
    assert!(data["id"].is_i64());
    assert!(data["created_at"].is_string());
}

#[tokio::test]
async fn duplicate_name_returns_409() {
    let app = build_test_app(Reply::Users);
    let first = post_json(app.router.clone(), "/api/v1/schemas", user_schema_body()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let json = expect_json(
        post_json(app.router, "/api/v1/schemas", user_schema_body()).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(json["code"], "CONFLICT");
    assert!(json["error"].as_str().unwrap().contains("User"));
}

#[tokio::test]
async fn blank_definition_returns_400() {
    let app = build_test_app(Reply::Users);
    let body = json!({ "name": "Empty", "type": "JSON_SCHEMA", "definition": "  " });
    let json = expect_json(
        post_json(app.router, "/api/v1/schemas", body).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_kind_is_a_bad_request() {
    let app = build_test_app(Reply::Users);
    let body = json!({ "name": "X", "type": "YAML", "definition": "x" });
    let json = expect_json(
        post_json(app.router, "/api/v1/schemas", body).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Read and list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_by_name_and_missing_name() {
    let app = build_test_app(Reply::Users);
    post_json(app.router.clone(), "/api/v1/schemas", user_schema_body()).await;

    let json = expect_json(
        get(app.router.clone(), "/api/v1/schemas/User").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["business_rules"], "- Age must be between 18 and 65");

    let json = expect_json(
        get(app.router, "/api/v1/schemas/Nobody").await,
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn active_only_filter_hides_inactive_schemas() {
    let app = build_test_app(Reply::Users);
    post_json(app.router.clone(), "/api/v1/schemas", user_schema_body()).await;
    post_json(
        app.router.clone(),
        "/api/v1/schemas",
        common::document_schema_body("Product"),
    )
    .await;

    let json = expect_json(
        patch_json(
            app.router.clone(),
            "/api/v1/schemas/Product/active",
            json!({ "active": false }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["active"], false);

    let all = expect_json(get(app.router.clone(), "/api/v1/schemas").await, StatusCode::OK).await;
    let names: Vec<&str> = all["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Product", "User"]);

    let active = expect_json(
        get(app.router, "/api/v1/schemas?activeOnly=true").await,
        StatusCode::OK,
    )
    .await;
    let active = active["data"].as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["name"], "User");
}

#[tokio::test]
async fn toggling_an_unknown_schema_returns_404() {
    let app = build_test_app(Reply::Users);
    let response = patch_json(
        app.router,
        "/api/v1/schemas/Ghost/active",
        json!({ "active": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
