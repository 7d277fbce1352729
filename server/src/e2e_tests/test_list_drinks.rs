//! Test `GET /drinks`.

use axum::http::StatusCode;
use serde_json::json;

use crate::e2e_tests::helpers::*;
use crate::testing::bearer_for;

#[tokio::test]
async fn test_list_drinks_short_form() {
    let app = TestApp::new();

    let response = app.get("/drinks", Some(&bearer_for(&["get:drinks"]))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({
            "success": true,
            "drinks": [
                { "id": 1, "title": "water", "recipe": [{ "color": "blue", "parts": 1 }] }
            ]
        })
    );
}

#[tokio::test]
async fn test_list_drinks_requires_get_drinks() {
    let app = TestApp::new();

    let response = app
        .get("/drinks", Some(&bearer_for(&["get:drinks-detail"])))
        .await;

    assert_error(&response, StatusCode::FORBIDDEN, "Permission not found.");
}

#[tokio::test]
async fn test_list_drinks_empty_store() {
    let app = TestApp::new();
    app.store.delete(1).await.expect("delete starter drink");

    let response = app.get("/drinks", Some(&bearer_for(&["get:drinks"]))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "success": true, "drinks": [] }));
}
