//! Permission scope checks.

use super::{AuthError, Claims};

/// Permission to list drinks (short form).
pub const GET_DRINKS: &str = "get:drinks";
/// Permission to list drinks with full recipes.
pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
/// Permission to create drinks.
pub const POST_DRINKS: &str = "post:drinks";
/// Permission to update drinks.
pub const PATCH_DRINKS: &str = "patch:drinks";
/// Permission to delete drinks.
pub const DELETE_DRINKS: &str = "delete:drinks";

/// Check that verified `claims` grant the `required` permission.
///
/// # Errors
/// Returns `AuthError::ClaimsMissingPermissions` if the token has no
/// `permissions` claim at all (the identity provider is not configured to
/// include it), and `AuthError::Forbidden` if the claim does not contain
/// `required`.
pub fn check_permission(required: &str, claims: &Claims) -> Result<(), AuthError> {
    if claims.permissions.is_none() {
        return Err(AuthError::ClaimsMissingPermissions);
    }

    if !claims.has_permission(required) {
        tracing::debug!("permission {required} not granted");
        return Err(AuthError::Forbidden);
    }

    Ok(())
}
