//! Claims carried by a verified access token.
//!
//! The standard claims are typed; anything else the identity provider puts in
//! the token is kept in `extra` so that serializing a `Claims` value reproduces
//! the token's claim set exactly.
//!
//! # Invariants
//! - A `Claims` value handed to request handlers has passed signature,
//!   issuer, audience and expiry checks (see `TokenVerifier::verify`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `aud` claim, which may be a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// A single audience.
    Single(String),
    /// Several audiences.
    Many(Vec<String>),
}

impl Audience {
    /// Whether `audience` is one of the token's audiences.
    #[must_use]
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Self::Single(value) => value == audience,
            Self::Many(values) => values.iter().any(|value| value == audience),
        }
    }
}

/// Decoded claims of an access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Subject (the caller's user id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    /// Expiry, in seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    /// Issued-at, in seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    /// Granted permission scopes. `None` means the claim was absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    /// Every other claim, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Whether the token grants `scope`.
    ///
    /// Returns `false` when the `permissions` claim is absent.
    #[must_use]
    pub fn has_permission(&self, scope: &str) -> bool {
        self.permissions
            .as_ref()
            .is_some_and(|permissions| permissions.iter().any(|granted| granted == scope))
    }
}
