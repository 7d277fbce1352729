//! Server configuration module.
//!
//! This module provides configuration loading for the coffee shop server from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `COFFEE_SHOP_AUTH0_DOMAIN`: Identity provider domain (required)
//! - `COFFEE_SHOP_API_AUDIENCE`: Audience tokens must be issued for (required)
//! - `COFFEE_SHOP_AUTH0_ISSUER`: Expected token issuer (default: `https://<domain>/`)
//! - `COFFEE_SHOP_JWT_ALGORITHM`: Token signature algorithm (default: `RS256`)
//! - `COFFEE_SHOP_JWKS_CACHE_TTL_SECS`: How long fetched signing keys are trusted (default: `600`)
//! - `COFFEE_SHOP_JWKS_TIMEOUT_SECS`: Bound on a signing key fetch (default: `5`)
//! - `COFFEE_SHOP_JWT_LEEWAY_SECS`: Clock skew allowed on `exp` (default: `0`)
//! - `COFFEE_SHOP_LISTEN_PORT`: Port to listen on (default: `5000`)
//!
//! # Invariants
//!
//! - `auth0_domain`, `api_audience` and `issuer` are never empty
//! - `algorithm` is always an RSA signature algorithm
//! - `jwks_timeout` is never zero

use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;

/// Server configuration.
///
/// Contains all configuration parameters needed to run the server.
///
/// # Pre-conditions
///
/// When constructed via `from_env()`:
/// - All required environment variables must be set
/// - All values must be valid for their respective types
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Identity provider domain, e.g. `tenant.us.auth0.com`.
    pub auth0_domain: String,
    /// Audience tokens must be issued for.
    pub api_audience: String,
    /// Exact issuer tokens must carry.
    pub issuer: String,
    /// The only accepted signature algorithm.
    pub algorithm: Algorithm,
    /// How long a fetched key set is used before it is fetched again.
    pub jwks_cache_ttl: Duration,
    /// Bound on a single key set fetch.
    pub jwks_timeout: Duration,
    /// Clock skew allowed when checking `exp`.
    pub jwt_leeway: Duration,
    /// Port to listen on for HTTP connections.
    pub listen_port: u16,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable is missing.
    MissingEnvVar(String),
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEnvVar(name) => {
                write!(f, "missing required environment variable: {name}")
            }
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

const AUTH0_DOMAIN: &str = "COFFEE_SHOP_AUTH0_DOMAIN";
const API_AUDIENCE: &str = "COFFEE_SHOP_API_AUDIENCE";
const AUTH0_ISSUER: &str = "COFFEE_SHOP_AUTH0_ISSUER";
const JWT_ALGORITHM: &str = "COFFEE_SHOP_JWT_ALGORITHM";
const JWKS_CACHE_TTL_SECS: &str = "COFFEE_SHOP_JWKS_CACHE_TTL_SECS";
const JWKS_TIMEOUT_SECS: &str = "COFFEE_SHOP_JWKS_TIMEOUT_SECS";
const JWT_LEEWAY_SECS: &str = "COFFEE_SHOP_JWT_LEEWAY_SECS";
const LISTEN_PORT: &str = "COFFEE_SHOP_LISTEN_PORT";

impl ServerConfig {
    /// Default port for the server.
    pub const DEFAULT_PORT: u16 = 5000;
    /// Default signature algorithm.
    pub const DEFAULT_ALGORITHM: Algorithm = Algorithm::RS256;
    /// Default key set cache lifetime, in seconds.
    pub const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 600;
    /// Default key set fetch timeout, in seconds.
    pub const DEFAULT_JWKS_TIMEOUT_SECS: u64 = 5;
    /// Default clock skew allowance, in seconds.
    pub const DEFAULT_JWT_LEEWAY_SECS: u64 = 0;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `COFFEE_SHOP_AUTH0_DOMAIN` or `COFFEE_SHOP_API_AUDIENCE` is not set or is empty
    /// - Any optional variable is set to an invalid value
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// `lookup` returns `None` for unset variables.
    ///
    /// # Errors
    ///
    /// Same as `from_env`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let auth0_domain = required(&lookup, AUTH0_DOMAIN)?;
        let api_audience = required(&lookup, API_AUDIENCE)?;
        let issuer = match lookup(AUTH0_ISSUER) {
            Some(issuer) if issuer.is_empty() => {
                return Err(ConfigError::InvalidValue {
                    name: AUTH0_ISSUER.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
            Some(issuer) => issuer,
            None => format!("https://{auth0_domain}/"),
        };
        let algorithm = Self::load_algorithm(&lookup)?;
        let jwks_cache_ttl = Duration::from_secs(seconds(
            &lookup,
            JWKS_CACHE_TTL_SECS,
            Self::DEFAULT_JWKS_CACHE_TTL_SECS,
        )?);
        let jwks_timeout = Duration::from_secs(seconds(
            &lookup,
            JWKS_TIMEOUT_SECS,
            Self::DEFAULT_JWKS_TIMEOUT_SECS,
        )?);
        if jwks_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: JWKS_TIMEOUT_SECS.to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        let jwt_leeway = Duration::from_secs(seconds(
            &lookup,
            JWT_LEEWAY_SECS,
            Self::DEFAULT_JWT_LEEWAY_SECS,
        )?);
        let listen_port = Self::load_listen_port(&lookup)?;

        Ok(Self {
            auth0_domain,
            api_audience,
            issuer,
            algorithm,
            jwks_cache_ttl,
            jwks_timeout,
            jwt_leeway,
            listen_port,
        })
    }

    /// Load the signature algorithm.
    ///
    /// Returns the default if not set.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an RSA signature algorithm.
    fn load_algorithm(lookup: impl Fn(&str) -> Option<String>) -> Result<Algorithm, ConfigError> {
        let Some(value) = lookup(JWT_ALGORITHM) else {
            return Ok(Self::DEFAULT_ALGORITHM);
        };

        let invalid = || ConfigError::InvalidValue {
            name: JWT_ALGORITHM.to_string(),
            message: format!("'{value}' is not an RSA signature algorithm"),
        };
        let algorithm = Algorithm::from_str(&value).map_err(|_| invalid())?;
        match algorithm {
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => Ok(algorithm),
            _ => Err(invalid()),
        }
    }

    /// Load the listen port.
    ///
    /// Returns the default if not set.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is set but not a valid port number.
    fn load_listen_port(lookup: impl Fn(&str) -> Option<String>) -> Result<u16, ConfigError> {
        let Some(value) = lookup(LISTEN_PORT) else {
            return Ok(Self::DEFAULT_PORT);
        };
        match value.parse::<u16>() {
            Ok(port) if port != 0 => Ok(port),
            _ => Err(ConfigError::InvalidValue {
                name: LISTEN_PORT.to_string(),
                message: format!("'{value}' is not a valid port number (must be 1-65535)"),
            }),
        }
    }
}

/// Load a required, non-empty variable.
fn required(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Result<String, ConfigError> {
    let value = lookup(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))?;
    if value.is_empty() {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(value)
}

/// Load a whole number of seconds, or `default` if unset.
fn seconds(
    lookup: impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    match lookup(name) {
        Some(value) => value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("'{value}' is not a whole number of seconds"),
        }),
        None => Ok(default),
    }
}
