//! Authentication and authorization.
//!
//! This module verifies bearer tokens issued by an external identity provider
//! and enforces permission scopes per route.
//!
//! # Pre-conditions
//! - The identity provider publishes its signing keys at
//!   `https://<domain>/.well-known/jwks.json`.
//!
//! # Post-conditions
//! - Handlers only ever see claims from tokens that passed verification and
//!   the route's permission check.
//!
//! # Invariants
//! - Tokens are only verified, never issued.

pub mod claims;
pub mod error;
pub mod guard;
pub mod jwks;
pub mod permissions;
pub mod verifier;

pub use claims::{Audience, Claims};
pub use error::AuthError;
pub use guard::{Authorized, Guard, Permission, require_permission};
pub use jwks::{JWKS_PATH, JwksCache, JwksClient, JwksError, KeySource, StaticKeySource};
pub use permissions::check_permission;
pub use verifier::{TokenVerifier, parse_bearer};
