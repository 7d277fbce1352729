//! Test unknown paths and unsupported methods.

use axum::http::{Method, StatusCode};

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_unknown_path() {
    let app = TestApp::new();
    let response = app.get("/coffee", None).await;
    assert_error(&response, StatusCode::NOT_FOUND, "resource not found");
}

#[tokio::test]
async fn test_wrong_method() {
    let app = TestApp::new();
    let response = app.send(Method::PUT, "/drinks", None, None).await;
    assert_error(
        &response,
        StatusCode::METHOD_NOT_ALLOWED,
        "Method Not Allowed",
    );
}

#[tokio::test]
async fn test_get_single_drink_not_routed() {
    let app = TestApp::new();
    let response = app.get("/drinks/1", None).await;
    assert_error(
        &response,
        StatusCode::METHOD_NOT_ALLOWED,
        "Method Not Allowed",
    );
}
