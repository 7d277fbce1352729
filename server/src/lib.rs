// Life of a request:
// 1. HTTP request comes in
// 2. The route's `Authorized<_>` extractor runs first:
//     - Parse the `Authorization: Bearer <token>` header
//     - Look up the token's signing key (JWKS, cached)
//     - Verify signature, expiry, issuer and audience
//     - Check the route's permission scope
//    Any failure is answered right here; the handler never runs.
// 3. The handler parses the body and reads / writes the drink store
// 4. Respond with `{"success": true, ...}` or the JSON error envelope
//
// System components:
//  - Auth: verifier, JWKS cache, permission guard
//  - Drink store
//  - HTTP routes

pub mod api;
pub mod auth;
pub mod config;
pub mod drinks;


pub use api::{AppState, router};
