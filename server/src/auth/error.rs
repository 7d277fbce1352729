//! Authorization failures.
//!
//! Every failure carries an HTTP status and a stable `(code, description)` pair.
//! All variants except `KeySetUnavailable` are caller faults (4xx).
//! `KeySetUnavailable` means the identity provider could not be consulted,
//! which is an operational fault and is reported as 503.
//!
//! # Invariants
//! - `code()` and `description()` never change for a given variant (and cause).
//! - An `AuthError` is immutable once constructed.

use axum::http::StatusCode;

/// Error returned when a request fails authentication or authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header was sent.
    HeaderMissing,
    /// The `Authorization` header or the token header is malformed.
    MalformedHeader(&'static str),
    /// The token's key id is not in the identity provider's key set.
    UnknownKey,
    /// The token could not be parsed, or its signature or algorithm is wrong.
    InvalidToken,
    /// The token's `exp` claim is in the past.
    TokenExpired,
    /// The token's audience or issuer does not match, or one is missing.
    InvalidClaims,
    /// The verified token has no `permissions` claim at all.
    ClaimsMissingPermissions,
    /// The verified token does not grant the required permission.
    Forbidden,
    /// The signing keys could not be fetched or used.
    KeySetUnavailable,
}

impl AuthError {
    /// Description used when the header does not start with `Bearer`.
    pub const WRONG_SCHEME: &'static str = "Authorization header must start with \"Bearer\".";
    /// Description used when the header has a scheme but no token.
    pub const TOKEN_NOT_FOUND: &'static str = "Token not found.";
    /// Description used when the header has more than two parts.
    pub const NOT_BEARER_TOKEN: &'static str = "Authorization header must be bearer token.";
    /// Description used when the token header cannot be read or lacks a key id.
    pub const AUTHORIZATION_MALFORMED: &'static str = "Authorization malformed.";

    /// HTTP status the error is reported with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::HeaderMissing
            | Self::MalformedHeader(_)
            | Self::UnknownKey
            | Self::TokenExpired
            | Self::InvalidClaims => StatusCode::UNAUTHORIZED,
            Self::InvalidToken | Self::ClaimsMissingPermissions => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::KeySetUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::HeaderMissing => "authorization_header_missing",
            Self::MalformedHeader(_) | Self::UnknownKey | Self::InvalidToken => "invalid_header",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims | Self::ClaimsMissingPermissions => "invalid_claims",
            Self::Forbidden => "unauthorized",
            Self::KeySetUnavailable => "jwks_unavailable",
        }
    }

    /// Human-readable description, sent to the client as the error message.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::HeaderMissing => "Authorization header is expected.",
            Self::MalformedHeader(reason) => *reason,
            Self::UnknownKey => "Unable to find the appropriate key.",
            Self::InvalidToken => "Unable to parse authentication token.",
            Self::TokenExpired => "Token expired.",
            Self::InvalidClaims => "Incorrect claims. Please, check the audience and issuer.",
            Self::ClaimsMissingPermissions => "Permissions not included in JWT.",
            Self::Forbidden => "Permission not found.",
            Self::KeySetUnavailable => "Unable to retrieve signing keys.",
        }
    }

    /// Whether the failure is the caller's fault rather than an operational one.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

impl std::error::Error for AuthError {}
