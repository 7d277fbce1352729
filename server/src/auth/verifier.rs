//! Bearer token verification.
//!
//! Verifies a raw `Authorization` header value and yields the token's claims.
//!
//! # Pre-conditions
//! - The verifier is configured with the identity provider's issuer, the API
//!   audience, and an RSA signature algorithm.
//!
//! # Post-conditions
//! - On success, the returned `Claims` passed signature, expiry, issuer and
//!   audience checks and are the token's claim set unchanged.
//! - On failure, the returned `AuthError` names the first check that failed.
//!
//! # Invariants
//! - Only the configured algorithm is ever accepted.
//! - A token without a key id is rejected before any key lookup.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};

use super::{AuthError, Claims, KeySource};

/// Split a raw `Authorization` header value into its bearer token.
///
/// The value must be exactly two whitespace-separated parts, the first of
/// which is `bearer` in any case.
///
/// # Errors
/// Returns `AuthError::HeaderMissing` if `raw_header` is `None`, and
/// `AuthError::MalformedHeader` if it is not of the form `Bearer <token>`.
pub fn parse_bearer(raw_header: Option<&str>) -> Result<&str, AuthError> {
    let raw_header = raw_header.ok_or(AuthError::HeaderMissing)?;
    let mut parts = raw_header.split_whitespace();

    let scheme = parts
        .next()
        .ok_or(AuthError::MalformedHeader(AuthError::WRONG_SCHEME))?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader(AuthError::WRONG_SCHEME));
    }

    let token = parts
        .next()
        .ok_or(AuthError::MalformedHeader(AuthError::TOKEN_NOT_FOUND))?;
    if parts.next().is_some() {
        return Err(AuthError::MalformedHeader(AuthError::NOT_BEARER_TOKEN));
    }

    Ok(token)
}

/// Verifies bearer tokens against an identity provider's signing keys.
pub struct TokenVerifier {
    keys: Arc<dyn KeySource>,
    validation: Validation,
    algorithm: Algorithm,
}

impl TokenVerifier {
    /// Default allowance for clock skew when checking `exp`. A token is
    /// rejected as soon as `exp` has passed.
    pub const DEFAULT_LEEWAY: Duration = Duration::ZERO;

    /// Create a verifier.
    ///
    /// # Arguments
    /// * `keys` - Where signing keys are looked up.
    /// * `issuer` - The exact `iss` value tokens must carry.
    /// * `audience` - A value the token's `aud` must contain.
    /// * `algorithm` - The only signature algorithm accepted.
    #[must_use]
    pub fn new(
        keys: Arc<dyn KeySource>,
        issuer: &str,
        audience: &str,
        algorithm: Algorithm,
    ) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = Self::DEFAULT_LEEWAY.as_secs();

        Self {
            keys,
            validation,
            algorithm,
        }
    }

    /// Set the allowance for clock skew when checking `exp`.
    #[must_use]
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.validation.leeway = leeway.as_secs();
        self
    }

    /// Verify a raw `Authorization` header value and return the token's claims.
    ///
    /// # Errors
    /// - `HeaderMissing` if there is no header.
    /// - `MalformedHeader` if the header is not `Bearer <token>`, or the token
    ///   header cannot be read or has no `kid`.
    /// - `InvalidToken` if the token declares another algorithm, or its
    ///   signature or encoding is invalid.
    /// - `UnknownKey` if no signing key has the token's `kid`.
    /// - `TokenExpired` if `exp` has passed.
    /// - `InvalidClaims` if `iss` or `aud` is missing or wrong.
    /// - `KeySetUnavailable` if the signing keys cannot be fetched or used.
    pub async fn verify(&self, raw_header: Option<&str>) -> Result<Claims, AuthError> {
        let token = parse_bearer(raw_header)?;

        let header = decode_header(token)
            .map_err(|_| AuthError::MalformedHeader(AuthError::AUTHORIZATION_MALFORMED))?;
        let kid = header
            .kid
            .ok_or(AuthError::MalformedHeader(AuthError::AUTHORIZATION_MALFORMED))?;

        if header.alg != self.algorithm {
            tracing::debug!(
                "rejecting token signed with {:?}, expected {:?}",
                header.alg,
                self.algorithm
            );
            return Err(AuthError::InvalidToken);
        }

        let jwk = self
            .keys
            .find_key(&kid)
            .await
            .map_err(|e| {
                tracing::warn!("signing keys unavailable: {e}");
                AuthError::KeySetUnavailable
            })?
            .ok_or(AuthError::UnknownKey)?;

        let key = DecodingKey::from_jwk(&jwk).map_err(|e| {
            tracing::warn!("signing key {kid} is unusable: {e}");
            AuthError::KeySetUnavailable
        })?;

        let token_data = decode::<Claims>(token, &key, &self.validation).map_err(map_jwt_error)?;
        Ok(token_data.claims)
    }
}

/// Maps jsonwebtoken errors to our `AuthError` type.
fn map_jwt_error(error: jsonwebtoken::errors::Error) -> AuthError {
    match error.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience
        | ErrorKind::InvalidIssuer
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
        _ => {
            tracing::debug!("token rejected: {error}");
            AuthError::InvalidToken
        }
    }
}
