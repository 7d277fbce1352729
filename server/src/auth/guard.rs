//! Route guards.
//!
//! A `Guard` ties a required permission to the verifier: it verifies the
//! bearer token, checks the permission, and only then hands out claims.
//! Handlers receive claims through the `Authorized<P>` extractor, so a handler
//! that needs claims cannot run unless its guard passed.
//!
//! # Post-conditions
//! - Any `AuthError` reaches the client unchanged as `ApiError::Auth`, and
//!   the handler body never runs.

use std::marker::PhantomData;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::permissions::{
    DELETE_DRINKS, GET_DRINKS, GET_DRINKS_DETAIL, PATCH_DRINKS, POST_DRINKS, check_permission,
};
use super::{AuthError, Claims, TokenVerifier};
use crate::api::ApiError;

/// Verifies a token and requires one permission scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guard {
    scope: &'static str,
}

/// Create a guard that requires `scope`.
#[must_use]
pub const fn require_permission(scope: &'static str) -> Guard {
    Guard { scope }
}

impl Guard {
    /// The permission this guard requires.
    #[must_use]
    pub const fn scope(&self) -> &'static str {
        self.scope
    }

    /// Verify `raw_header` and check this guard's permission.
    ///
    /// # Errors
    /// Returns the verifier's or the permission check's `AuthError` unchanged.
    pub async fn authorize(
        &self,
        verifier: &TokenVerifier,
        raw_header: Option<&str>,
    ) -> Result<Claims, AuthError> {
        let claims = verifier.verify(raw_header).await?;
        check_permission(self.scope, &claims)?;
        Ok(claims)
    }
}

/// A permission that a route can require, as a type.
pub trait Permission: Send + Sync + 'static {
    /// The guard enforcing this permission.
    const GUARD: Guard;
}

macro_rules! permissions {
    ($($(#[$doc:meta])* $name:ident => $scope:expr;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl Permission for $name {
                const GUARD: Guard = require_permission($scope);
            }
        )*
    };
}

permissions! {
    /// `get:drinks`
    GetDrinks => GET_DRINKS;
    /// `get:drinks-detail`
    GetDrinksDetail => GET_DRINKS_DETAIL;
    /// `post:drinks`
    PostDrinks => POST_DRINKS;
    /// `patch:drinks`
    PatchDrinks => PATCH_DRINKS;
    /// `delete:drinks`
    DeleteDrinks => DELETE_DRINKS;
}

/// Claims of a request that passed the guard for `P`.
///
/// Use as the first extractor of a handler.
pub struct Authorized<P> {
    claims: Claims,
    _permission: PhantomData<fn() -> P>,
}

impl<P> Authorized<P> {
    /// The verified claims.
    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Take the verified claims.
    #[must_use]
    pub fn into_claims(self) -> Claims {
        self.claims
    }
}

impl<P, S> FromRequestParts<S> for Authorized<P>
where
    P: Permission,
    Arc<TokenVerifier>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = Arc::<TokenVerifier>::from_ref(state);
        let raw_header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| {
                value
                    .to_str()
                    .map_err(|_| AuthError::MalformedHeader(AuthError::AUTHORIZATION_MALFORMED))
            })
            .transpose()
            .map_err(ApiError::Auth)?;

        match P::GUARD.authorize(&verifier, raw_header).await {
            Ok(claims) => Ok(Self {
                claims,
                _permission: PhantomData,
            }),
            Err(e) => {
                if e.is_client_error() {
                    tracing::debug!("{} {} denied: {e}", parts.method, parts.uri.path());
                } else {
                    tracing::warn!(
                        "{} {} could not be authorized: {e}",
                        parts.method,
                        parts.uri.path()
                    );
                }
                Err(ApiError::Auth(e))
            }
        }
    }
}
