//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `FASHIONARY_BACKEND_URL` - Catalog/try-on backend base URL (falls back to
//!   `BACKEND_URL`, default: `http://localhost:8000`)
//! - `BACKEND_TIMEOUT_SECS` - Per-request timeout for backend calls (default:
//!   unset, the transport defaults apply)
//! - `CATALOG_DISPLAY_FAILURE` - `abort` (default) fails the whole product list
//!   when one display fetch fails, `skip` drops just that product
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default backend location used by local development setups.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// What the catalog loader does when a single product display fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayFailurePolicy {
    /// Fail the whole products branch on the first rejected display fetch.
    #[default]
    Abort,
    /// Drop the failed product and keep the rest.
    Skip,
}

impl std::str::FromStr for DisplayFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(format!("expected \"abort\" or \"skip\", got \"{other}\"")),
        }
    }
}

/// Backend client configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the catalog/try-on backend
    pub base_url: Url,
    /// Optional per-request timeout
    pub timeout: Option<Duration>,
}

impl BackendConfig {
    /// Configuration pointing at `base_url` with no client-side timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("FASHIONARY_BACKEND_URL", base_url)?,
            timeout: None,
        })
    }

    /// Load the backend section from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL or the timeout is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = get_optional_env("FASHIONARY_BACKEND_URL")
            .or_else(|| get_optional_env("BACKEND_URL"))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let base_url = parse_base_url("FASHIONARY_BACKEND_URL", &raw)?;

        let timeout = get_optional_env("BACKEND_TIMEOUT_SECS")
            .map(|value| {
                value.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    ConfigError::InvalidEnvVar("BACKEND_TIMEOUT_SECS".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self { base_url, timeout })
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Backend client configuration
    pub backend: BackendConfig,
    /// Catalog loader behaviour on display fetch failures
    pub display_failure_policy: DisplayFailurePolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;

        let backend = BackendConfig::from_env()?;
        let display_failure_policy = get_env_or_default("CATALOG_DISPLAY_FAILURE", "abort")
            .parse::<DisplayFailurePolicy>()
            .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_DISPLAY_FAILURE".to_string(), e))?;

        Ok(Self {
            host,
            port,
            backend,
            display_failure_policy,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse a sample rate in `[0.0, 1.0]`.
fn get_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(value) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = value
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

/// Parse and validate the backend base URL.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme \"{}\"", url.scheme()),
        ));
    }

    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute URL with a host".to_string(),
        ));
    }

    Ok(url)
}
