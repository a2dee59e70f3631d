//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CLOVER_API_BASE_URL` - Base URL of the storefront backend
//!   (default: <http://localhost:8080>)
//! - `CLOVER_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid base URL {0}: {1}")]
    InvalidBaseUrl(String, String),
}

/// Client SDK configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the storefront backend, without a trailing slash.
    pub base_url: Url,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_env_or_default("CLOVER_API_BASE_URL", DEFAULT_BASE_URL);
        let timeout_secs = get_env_or_default(
            "CLOVER_HTTP_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("CLOVER_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        let mut config = Self::new(&base_url)?;
        config.timeout = Duration::from_secs(timeout_secs);
        Ok(config)
    }

    /// Create a configuration for a given backend base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid absolute URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(base_url.to_string(), e.to_string()))?;

        if !url.has_host() {
            return Err(ConfigError::InvalidBaseUrl(
                base_url.to_string(),
                "base URL must have a host".to_string(),
            ));
        }

        Ok(Self {
            base_url: url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Base URL as a string with any trailing slash removed, ready for
    /// endpoint path concatenation.
    #[must_use]
    pub fn base_url_str(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_string()
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
