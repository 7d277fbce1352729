//! Identity provider signing keys (JWKS).
//!
//! `JwksClient` fetches the provider's published key set. `JwksCache` keeps the
//! last fetched set and decides when to fetch again. Both sit behind the
//! `KeySource` trait so the verifier does not care where keys come from.
//!
//! # Pre-conditions
//! - The JWKS endpoint serves a JSON Web Key Set over HTTP(S).
//!
//! # Post-conditions
//! - Every fetch is bounded by the client timeout.
//! - A failed fetch is reported as `JwksError`, never as "key not found".
//!
//! # Invariants
//! - A cached key set is never mutated; a refetch replaces it whole.
//! - At most one refetch is in flight per cache.
//! - A miss on an unknown key id triggers at most one refetch per
//!   `min_refresh_interval`.
//! - After a failed fetch, lookups fail fast with `JwksError::Backoff` until
//!   `min_refresh_interval` has passed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use tokio::sync::{Mutex, RwLock};

/// Error returned when the key set cannot be fetched.
#[derive(Debug)]
pub enum JwksError {
    /// The HTTP client could not be built.
    Client(reqwest::Error),
    /// The request failed or timed out.
    Request(reqwest::Error),
    /// The endpoint answered with a non-success status.
    Status(reqwest::StatusCode),
    /// The response body is not a valid key set.
    Decode(reqwest::Error),
    /// A recent fetch failed; no new fetch is attempted until `retry_in` passes.
    Backoff { retry_in: Duration },
}

impl std::fmt::Display for JwksError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client(e) => write!(f, "failed to build JWKS client: {e}"),
            Self::Request(e) => write!(f, "failed to fetch JWKS: {e}"),
            Self::Status(status) => write!(f, "JWKS endpoint returned HTTP {status}"),
            Self::Decode(e) => write!(f, "invalid JWKS document: {e}"),
            Self::Backoff { retry_in } => {
                write!(f, "JWKS fetch failed recently, next attempt in {retry_in:?}")
            }
        }
    }
}

impl std::error::Error for JwksError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Client(e) | Self::Request(e) | Self::Decode(e) => Some(e),
            Self::Status(_) | Self::Backoff { .. } => None,
        }
    }
}

/// Path of the key set relative to the identity provider's domain.
pub const JWKS_PATH: &str = "/.well-known/jwks.json";

/// HTTP client for an identity provider's key set endpoint.
#[derive(Debug, Clone)]
pub struct JwksClient {
    http: reqwest::Client,
    url: String,
}

impl JwksClient {
    /// Create a client for `https://{domain}/.well-known/jwks.json`.
    ///
    /// # Errors
    /// Returns `JwksError::Client` if the HTTP client cannot be built.
    pub fn for_domain(domain: &str, timeout: Duration) -> Result<Self, JwksError> {
        Self::new(format!("https://{domain}{JWKS_PATH}"), timeout)
    }

    /// Create a client for an explicit key set URL.
    ///
    /// # Errors
    /// Returns `JwksError::Client` if the HTTP client cannot be built.
    pub fn new(url: String, timeout: Duration) -> Result<Self, JwksError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(JwksError::Client)?;
        Ok(Self { http, url })
    }

    /// The key set URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the current key set.
    ///
    /// No retries; the caller decides whether to try again.
    ///
    /// # Errors
    /// Returns `JwksError` if the request fails, times out, returns a
    /// non-success status, or the body is not a key set.
    pub async fn fetch_keys(&self) -> Result<JwkSet, JwksError> {
        tracing::debug!("fetching JWKS from {}", self.url);

        let response = self
            .http
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(JwksError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(JwksError::Status(status));
        }

        let keys: JwkSet = response.json().await.map_err(JwksError::Decode)?;
        tracing::info!("fetched {} signing keys from {}", keys.keys.len(), self.url);
        Ok(keys)
    }
}

/// Somewhere signing keys can be looked up by key id.
pub trait KeySource: Send + Sync {
    /// Find the key with the given key id.
    ///
    /// Returns `Ok(None)` if the key set is available but has no such key.
    fn find_key<'a>(&'a self, kid: &'a str) -> BoxFuture<'a, Result<Option<Jwk>, JwksError>>;
}

/// A fixed key set that never changes.
#[derive(Debug, Clone)]
pub struct StaticKeySource {
    keys: Arc<JwkSet>,
}

impl StaticKeySource {
    /// Wrap a key set.
    #[must_use]
    pub fn new(keys: JwkSet) -> Self {
        Self {
            keys: Arc::new(keys),
        }
    }
}

impl KeySource for StaticKeySource {
    fn find_key<'a>(&'a self, kid: &'a str) -> BoxFuture<'a, Result<Option<Jwk>, JwksError>> {
        let key = self.keys.find(kid).cloned();
        Box::pin(async move { Ok(key) })
    }
}

/// Last successfully fetched key set.
#[derive(Clone)]
struct CachedKeys {
    keys: Arc<JwkSet>,
    fetched_at: Instant,
}

/// Key set cache in front of a `JwksClient`.
///
/// Readers take a short read lock to clone the current `Arc<JwkSet>`; a
/// refetch swaps in a new `Arc` under the write lock.
pub struct JwksCache {
    client: JwksClient,
    ttl: Duration,
    min_refresh_interval: Duration,
    current: RwLock<Option<CachedKeys>>,
    /// Held for the whole of a refresh. Holds the time of the last failed fetch.
    refresh_lock: Mutex<Option<Instant>>,
}

impl JwksCache {
    /// Default minimum time between refetches triggered by unknown key ids.
    pub const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

    /// Create an empty cache. The first lookup fetches the key set.
    #[must_use]
    pub fn new(client: JwksClient, ttl: Duration) -> Self {
        Self {
            client,
            ttl,
            min_refresh_interval: Self::DEFAULT_MIN_REFRESH_INTERVAL,
            current: RwLock::new(None),
            refresh_lock: Mutex::new(None),
        }
    }

    /// Override the minimum time between refetches triggered by unknown key
    /// ids, and between attempts after a failed fetch.
    #[must_use]
    pub const fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    async fn snapshot(&self) -> Option<CachedKeys> {
        self.current.read().await.clone()
    }

    /// Look up `kid`, refetching the key set when it is missing, stale, or
    /// lacks the key and was not fetched recently.
    ///
    /// # Errors
    /// Returns `JwksError` if a needed refetch fails.
    pub async fn get_key(&self, kid: &str) -> Result<Option<Jwk>, JwksError> {
        if let Some(cached) = self.snapshot().await {
            let age = cached.fetched_at.elapsed();
            if age < self.ttl {
                if let Some(jwk) = cached.keys.find(kid) {
                    return Ok(Some(jwk.clone()));
                }
                if age < self.min_refresh_interval {
                    tracing::debug!("key id {kid} not in recently fetched JWKS");
                    return Ok(None);
                }
            }
        }

        let keys = self.refresh().await?;
        Ok(keys.find(kid).cloned())
    }

    /// Fetch the key set and replace the cached one.
    ///
    /// Concurrent callers wait for a single fetch. A caller that waited
    /// reuses the set another caller just fetched, or fails fast if that
    /// fetch failed.
    ///
    /// # Errors
    /// Returns `JwksError` if the fetch fails, and `JwksError::Backoff` if a
    /// fetch failed less than `min_refresh_interval` ago. The previously
    /// cached set is left in place.
    pub async fn refresh(&self) -> Result<Arc<JwkSet>, JwksError> {
        let mut last_failure = self.refresh_lock.lock().await;

        if let Some(cached) = self.snapshot().await {
            let age = cached.fetched_at.elapsed();
            if age < self.min_refresh_interval && age < self.ttl {
                return Ok(cached.keys);
            }
        }

        if let Some(failed_at) = *last_failure {
            let since = failed_at.elapsed();
            if since < self.min_refresh_interval {
                return Err(JwksError::Backoff {
                    retry_in: self.min_refresh_interval - since,
                });
            }
        }

        let keys = match self.client.fetch_keys().await {
            Ok(keys) => Arc::new(keys),
            Err(e) => {
                tracing::warn!("JWKS refresh from {} failed: {e}", self.client.url());
                *last_failure = Some(Instant::now());
                return Err(e);
            }
        };
        *last_failure = None;

        #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
        let cached = CachedKeys {
            keys: Arc::clone(&keys),
            fetched_at: Instant::now(),
        };
        *self.current.write().await = Some(cached);

        Ok(keys)
    }
}

impl KeySource for JwksCache {
    fn find_key<'a>(&'a self, kid: &'a str) -> BoxFuture<'a, Result<Option<Jwk>, JwksError>> {
        Box::pin(self.get_key(kid))
    }
}
