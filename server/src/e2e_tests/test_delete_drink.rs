//! Test `DELETE /drinks/{id}`.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::e2e_tests::helpers::*;
use crate::testing::bearer_for;

#[tokio::test]
async fn test_delete_drink() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::DELETE,
            "/drinks/1",
            Some(&bearer_for(&["delete:drinks"])),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "success": true, "delete": 1 }));
    assert!(app.store.list().await.is_empty());
}

#[tokio::test]
async fn test_delete_twice_is_404() {
    let app = TestApp::new();
    let bearer = bearer_for(&["delete:drinks"]);

    let first = app
        .send(Method::DELETE, "/drinks/1", Some(&bearer), None)
        .await;
    let second = app
        .send(Method::DELETE, "/drinks/1", Some(&bearer), None)
        .await;

    assert_eq!(first.status, StatusCode::OK);
    assert_error(&second, StatusCode::NOT_FOUND, "resource not found");
}

#[tokio::test]
async fn test_delete_requires_delete_scope() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::DELETE,
            "/drinks/1",
            Some(&bearer_for(&["patch:drinks"])),
            None,
        )
        .await;

    assert_error(&response, StatusCode::FORBIDDEN, "Permission not found.");
    assert_eq!(app.store.list().await.len(), 1);
}
