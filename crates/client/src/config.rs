//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `LUNCHDESK_BASE_URL` - Admin API base URL (default: `http://localhost:3000`)
//! - `LUNCHDESK_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)
//! - `LUNCHDESK_PAGE_SIZE` - Items per list page, 1 to 100 (default: 10)
//! - `LUNCHDESK_CACHE_TTL_SECS` - Query cache time-to-live (default: 300)
//! - `LUNCHDESK_CACHE_CAPACITY` - Maximum cached queries (default: 1000)

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_CACHE_CAPACITY: u64 = 1000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin API client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is joined onto. Always ends with `/`.
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Items requested per list page
    pub page_size: u32,
    /// How long a cached query result stays fresh
    pub cache_ttl: Duration,
    /// Maximum number of cached query results
    pub cache_capacity: u64,
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
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("LUNCHDESK_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url("LUNCHDESK_BASE_URL", &base_url)?;

        let timeout_secs = parse_or("LUNCHDESK_TIMEOUT_SECS", &lookup, DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(invalid("LUNCHDESK_TIMEOUT_SECS", "must be greater than zero"));
        }

        let page_size = parse_or("LUNCHDESK_PAGE_SIZE", &lookup, DEFAULT_PAGE_SIZE)?;
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(invalid(
                "LUNCHDESK_PAGE_SIZE",
                &format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }

        let cache_ttl = parse_or("LUNCHDESK_CACHE_TTL_SECS", &lookup, DEFAULT_CACHE_TTL_SECS)?;
        let cache_capacity = parse_or("LUNCHDESK_CACHE_CAPACITY", &lookup, DEFAULT_CACHE_CAPACITY)?;

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            page_size,
            cache_ttl: Duration::from_secs(cache_ttl),
            cache_capacity,
        })
    }

    /// Defaults pointed at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an absolute http(s) URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| (key == "LUNCHDESK_BASE_URL").then(|| base_url.to_string()))
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}

fn parse_or<T: std::str::FromStr>(
    key: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| invalid(key, &e.to_string())),
        None => Ok(default),
    }
}

/// Parse and normalize the API base URL so relative joins keep its path.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(key, &e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(key, "must use http or https"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(key, "must not contain a query or fragment"));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
