//! Test `GET /drinks-detail`.

use axum::http::StatusCode;
use serde_json::json;

use crate::e2e_tests::helpers::*;
use crate::testing::bearer_for;

#[tokio::test]
async fn test_drinks_detail_long_form() {
    let app = TestApp::new();

    let response = app
        .get("/drinks-detail", Some(&bearer_for(&["get:drinks-detail"])))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["drinks"][0]["recipe"],
        json!([{ "name": "water", "color": "blue", "parts": 1 }])
    );
}

#[tokio::test]
async fn test_drinks_detail_requires_its_own_scope() {
    let app = TestApp::new();

    let response = app
        .get("/drinks-detail", Some(&bearer_for(&["get:drinks"])))
        .await;

    assert_error(&response, StatusCode::FORBIDDEN, "Permission not found.");
}
