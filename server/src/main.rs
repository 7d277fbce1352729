#![cfg_attr(test, allow(clippy::disallowed_methods))]
// Forbid unwrap() in production code; a bad config or bind failure is
// reported through tracing and a non-zero exit instead.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::net::SocketAddr;
use std::sync::Arc;

use coffee_shop::auth::{JwksCache, JwksClient, TokenVerifier};
use coffee_shop::config::ServerConfig;
use coffee_shop::drinks::DrinkStore;
use coffee_shop::{AppState, router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coffee_shop=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: auth0_domain={}, audience={}, issuer={}, algorithm={:?}, listen_port={}",
        config.auth0_domain,
        config.api_audience,
        config.issuer,
        config.algorithm,
        config.listen_port
    );

    let jwks_client = match JwksClient::for_domain(&config.auth0_domain, config.jwks_timeout) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to create JWKS client: {e}");
            std::process::exit(1);
        }
    };
    let keys = Arc::new(JwksCache::new(jwks_client, config.jwks_cache_ttl));

    // Warm the key cache. Failure is not fatal: the identity provider may
    // come up later, and requests report 503 until it does.
    if let Err(e) = keys.refresh().await {
        tracing::warn!("Initial JWKS fetch failed: {e}");
    }

    let verifier = TokenVerifier::new(
        keys,
        &config.issuer,
        &config.api_audience,
        config.algorithm,
    )
    .with_leeway(config.jwt_leeway);

    let state = AppState::new(Arc::new(verifier), Arc::new(DrinkStore::seeded()));
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.listen_port));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind: {e}");
            std::process::exit(1);
        });

    axum::serve(listener, app).await.unwrap_or_else(|e| {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    });
}
