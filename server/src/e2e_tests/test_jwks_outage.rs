//! Test behavior when the identity provider's key set cannot be fetched.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use jsonwebtoken::Algorithm;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::auth::{JWKS_PATH, JwksCache, JwksClient, TokenVerifier};
use crate::e2e_tests::helpers::*;
use crate::testing::{TEST_AUDIENCE, TEST_ISSUER, TEST_KID, bearer_for, test_jwks};

async fn app_over(server: &MockServer) -> TestApp {
    let client = JwksClient::new(
        format!("{}{JWKS_PATH}", server.uri()),
        Duration::from_secs(2),
    )
    .expect("client builds");
    let cache = Arc::new(JwksCache::new(client, Duration::from_secs(600)));
    TestApp::with_verifier(TokenVerifier::new(
        cache,
        TEST_ISSUER,
        TEST_AUDIENCE,
        Algorithm::RS256,
    ))
}

#[tokio::test]
async fn test_outage_is_service_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let app = app_over(&server).await;

    let response = app.get("/drinks", Some(&bearer_for(&["get:drinks"]))).await;

    assert_error(
        &response,
        StatusCode::SERVICE_UNAVAILABLE,
        "Unable to retrieve signing keys.",
    );
}

#[tokio::test]
async fn test_fetched_keys_verify_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_jwks(&[TEST_KID])))
        .expect(1)
        .mount(&server)
        .await;
    let app = app_over(&server).await;
    let bearer = bearer_for(&["get:drinks"]);

    let first = app.get("/drinks", Some(&bearer)).await;
    let second = app.get("/drinks", Some(&bearer)).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::OK);
}
