//! Test how the guard rejects requests before they reach a handler.

use axum::http::StatusCode;
use jsonwebtoken::{Algorithm, Header, get_current_timestamp};

use crate::auth::AuthError;
use crate::e2e_tests::helpers::*;
use crate::testing::{
    SECONDARY_KID, TEST_KID, bearer_for, expired_claims, mint_token, mint_token_with_header,
    valid_claims,
};

#[tokio::test]
async fn test_missing_header() {
    let app = TestApp::new();
    let response = app.get("/drinks", None).await;
    assert_error(
        &response,
        StatusCode::UNAUTHORIZED,
        "Authorization header is expected.",
    );
}

#[tokio::test]
async fn test_wrong_scheme() {
    let app = TestApp::new();
    let token = mint_token(TEST_KID, &valid_claims(&["get:drinks"]));

    let response = app.get("/drinks", Some(&format!("Basic {token}"))).await;

    assert_error(&response, StatusCode::UNAUTHORIZED, AuthError::WRONG_SCHEME);
}

#[tokio::test]
async fn test_scheme_without_token() {
    let app = TestApp::new();
    let response = app.get("/drinks", Some("Bearer")).await;
    assert_error(&response, StatusCode::UNAUTHORIZED, AuthError::TOKEN_NOT_FOUND);
}

#[tokio::test]
async fn test_too_many_parts() {
    let app = TestApp::new();
    let response = app.get("/drinks", Some("Bearer a.b.c extra")).await;
    assert_error(
        &response,
        StatusCode::UNAUTHORIZED,
        AuthError::NOT_BEARER_TOKEN,
    );
}

#[tokio::test]
async fn test_garbage_token() {
    let app = TestApp::new();
    let response = app.get("/drinks", Some("Bearer not-a-jwt")).await;
    assert_error(
        &response,
        StatusCode::UNAUTHORIZED,
        AuthError::AUTHORIZATION_MALFORMED,
    );
}

#[tokio::test]
async fn test_token_without_key_id() {
    let app = TestApp::new();
    let token = mint_token_with_header(
        &Header::new(Algorithm::RS256),
        TEST_KID,
        &valid_claims(&["get:drinks"]),
    );

    let response = app.get("/drinks", Some(&format!("Bearer {token}"))).await;

    assert_error(
        &response,
        StatusCode::UNAUTHORIZED,
        AuthError::AUTHORIZATION_MALFORMED,
    );
}

#[tokio::test]
async fn test_unknown_key() {
    let app = TestApp::new();
    let token = mint_token(SECONDARY_KID, &valid_claims(&["get:drinks"]));

    let response = app.get("/drinks", Some(&format!("Bearer {token}"))).await;

    assert_error(
        &response,
        StatusCode::UNAUTHORIZED,
        "Unable to find the appropriate key.",
    );
}

#[tokio::test]
async fn test_expired_token() {
    let app = TestApp::new();
    let token = mint_token(TEST_KID, &expired_claims(&["get:drinks"]));

    let response = app.get("/drinks", Some(&format!("Bearer {token}"))).await;

    assert_error(&response, StatusCode::UNAUTHORIZED, "Token expired.");
}

#[tokio::test]
async fn test_token_expired_seconds_ago() {
    let app = TestApp::new();
    let mut claims = valid_claims(&["get:drinks"]);
    claims["exp"] = (get_current_timestamp() - 30).into();
    let token = mint_token(TEST_KID, &claims);

    let response = app.get("/drinks", Some(&format!("Bearer {token}"))).await;

    assert_error(&response, StatusCode::UNAUTHORIZED, "Token expired.");
}

#[tokio::test]
async fn test_wrong_audience() {
    let app = TestApp::new();
    let mut claims = valid_claims(&["get:drinks"]);
    claims["aud"] = "https://some-other-api/".into();
    let token = mint_token(TEST_KID, &claims);

    let response = app.get("/drinks", Some(&format!("Bearer {token}"))).await;

    assert_error(
        &response,
        StatusCode::UNAUTHORIZED,
        "Incorrect claims. Please, check the audience and issuer.",
    );
}

#[tokio::test]
async fn test_wrong_issuer() {
    let app = TestApp::new();
    let mut claims = valid_claims(&["get:drinks"]);
    claims["iss"] = "https://impostor.auth0.com/".into();
    let token = mint_token(TEST_KID, &claims);

    let response = app.get("/drinks", Some(&format!("Bearer {token}"))).await;

    assert_error(
        &response,
        StatusCode::UNAUTHORIZED,
        "Incorrect claims. Please, check the audience and issuer.",
    );
}

#[tokio::test]
async fn test_missing_permissions_claim() {
    let app = TestApp::new();
    let mut claims = valid_claims(&[]);
    claims
        .as_object_mut()
        .expect("claims are an object")
        .remove("permissions");
    let token = mint_token(TEST_KID, &claims);

    let response = app.get("/drinks", Some(&format!("Bearer {token}"))).await;

    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        "Permissions not included in JWT.",
    );
}

#[tokio::test]
async fn test_empty_permissions_is_forbidden() {
    let app = TestApp::new();
    let response = app.get("/drinks", Some(&bearer_for(&[]))).await;
    assert_error(&response, StatusCode::FORBIDDEN, "Permission not found.");
}

#[tokio::test]
async fn test_lowercase_scheme_accepted() {
    let app = TestApp::new();
    let token = mint_token(TEST_KID, &valid_claims(&["get:drinks"]));

    let response = app.get("/drinks", Some(&format!("bearer {token}"))).await;

    assert_eq!(response.status, StatusCode::OK);
}
