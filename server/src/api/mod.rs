//! HTTP surface: application state, routes and error envelope.

pub mod drinks;
pub mod error;

use std::sync::Arc;

use axum::Router;
use axum::extract::FromRef;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::TokenVerifier;
use crate::drinks::DrinkStore;

pub use error::ApiError;

/// Application context shared by every request.
///
/// Built once at startup and handed to the router; nothing is global.
#[derive(Clone)]
pub struct AppState {
    /// Verifies bearer tokens.
    pub verifier: Arc<TokenVerifier>,
    /// Drink storage.
    pub drinks: Arc<DrinkStore>,
}

impl AppState {
    /// Create the application context.
    #[must_use]
    pub const fn new(verifier: Arc<TokenVerifier>, drinks: Arc<DrinkStore>) -> Self {
        Self { verifier, drinks }
    }
}

impl FromRef<AppState> for Arc<TokenVerifier> {
    #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected for shared state
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.verifier)
    }
}

impl FromRef<AppState> for Arc<DrinkStore> {
    #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected for shared state
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.drinks)
    }
}

/// Build the application router.
///
/// | method | path | permission |
/// |---|---|---|
/// | GET | `/drinks` | `get:drinks` |
/// | GET | `/drinks-detail` | `get:drinks-detail` |
/// | POST | `/drinks` | `post:drinks` |
/// | PATCH | `/drinks/{id}` | `patch:drinks` |
/// | DELETE | `/drinks/{id}` | `delete:drinks` |
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/drinks",
            get(drinks::list_drinks).post(drinks::create_drink),
        )
        .route("/drinks-detail", get(drinks::drinks_detail))
        .route(
            "/drinks/{id}",
            axum::routing::patch(drinks::update_drink).delete(drinks::delete_drink),
        )
        .fallback(drinks::not_found)
        .method_not_allowed_fallback(drinks::method_not_allowed)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
