//! Test `POST /drinks`.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::e2e_tests::helpers::*;
use crate::testing::bearer_for;

const LATTE: &str = r#"{
    "title": "latte",
    "recipe": [
        { "name": "espresso", "color": "brown", "parts": 1 },
        { "name": "milk", "color": "white", "parts": 3 }
    ]
}"#;

#[tokio::test]
async fn test_create_drink() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/drinks",
            Some(&bearer_for(&["post:drinks"])),
            Some(LATTE),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({
            "success": true,
            "drinks": [{
                "id": 2,
                "title": "latte",
                "recipe": [
                    { "name": "espresso", "color": "brown", "parts": 1 },
                    { "name": "milk", "color": "white", "parts": 3 }
                ]
            }]
        })
    );
    assert_eq!(app.store.list().await.len(), 2);
}

#[tokio::test]
async fn test_create_drink_single_ingredient_recipe() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/drinks",
            Some(&bearer_for(&["post:drinks"])),
            Some(r#"{"title": "espresso", "recipe": {"name": "espresso", "color": "brown", "parts": 1}}"#),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["drinks"][0]["recipe"][0]["name"], "espresso");
}

#[tokio::test]
async fn test_create_drink_forbidden_leaves_store_untouched() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/drinks",
            Some(&bearer_for(&["get:drinks"])),
            Some(LATTE),
        )
        .await;

    assert_error(&response, StatusCode::FORBIDDEN, "Permission not found.");
    assert_eq!(app.store.list().await.len(), 1);
}

#[tokio::test]
async fn test_create_drink_auth_checked_before_body() {
    let app = TestApp::new();

    let response = app
        .send(Method::POST, "/drinks", None, Some("{not json"))
        .await;

    assert_error(
        &response,
        StatusCode::UNAUTHORIZED,
        "Authorization header is expected.",
    );
}

#[tokio::test]
async fn test_create_drink_malformed_json() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/drinks",
            Some(&bearer_for(&["post:drinks"])),
            Some("{not json"),
        )
        .await;

    assert_error(&response, StatusCode::BAD_REQUEST, "bad request");
}

#[tokio::test]
async fn test_create_drink_missing_fields() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/drinks",
            Some(&bearer_for(&["post:drinks"])),
            Some(r#"{"title": "no recipe"}"#),
        )
        .await;

    assert_error(&response, StatusCode::UNPROCESSABLE_ENTITY, "unprocessable");
}

#[tokio::test]
async fn test_create_drink_duplicate_title() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/drinks",
            Some(&bearer_for(&["post:drinks"])),
            Some(r#"{"title": "water", "recipe": [{"name": "water", "color": "blue", "parts": 1}]}"#),
        )
        .await;

    assert_error(&response, StatusCode::UNPROCESSABLE_ENTITY, "unprocessable");
    assert_eq!(app.store.list().await.len(), 1);
}

#[tokio::test]
async fn test_create_drink_empty_recipe() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/drinks",
            Some(&bearer_for(&["post:drinks"])),
            Some(r#"{"title": "air", "recipe": []}"#),
        )
        .await;

    assert_error(&response, StatusCode::UNPROCESSABLE_ENTITY, "unprocessable");
}
