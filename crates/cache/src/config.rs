//! Cache options, optionally loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CATALOG_CACHE_TIMEOUT` - Seconds a record stays fresh after `set` (default: 300)

use std::time::Duration;

use thiserror::Error;

const CACHE_TIMEOUT_VAR: &str = "CATALOG_CACHE_TIMEOUT";

/// Default freshness window, in seconds.
pub const DEFAULT_CACHE_TIMEOUT_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Options for a [`Cache`](crate::Cache).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// Seconds a record stays fresh after it is set without an explicit expiry.
    pub cache_timeout: u64,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            cache_timeout: DEFAULT_CACHE_TIMEOUT_SECS,
        }
    }
}

impl CacheOptions {
    /// Load options from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    /// Unset variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let cache_timeout = match lookup(CACHE_TIMEOUT_VAR) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar(CACHE_TIMEOUT_VAR.to_string(), e.to_string())
            })?,
            None => DEFAULT_CACHE_TIMEOUT_SECS,
        };

        Ok(Self { cache_timeout })
    }

    /// Freshness window as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.cache_timeout)
    }

    /// Freshness window in milliseconds, saturating at `i64::MAX`.
    #[must_use]
    pub fn timeout_millis(&self) -> i64 {
        i64::try_from(self.timeout().as_millis()).unwrap_or(i64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout_is_five_minutes() {
        let options = CacheOptions::default();
        assert_eq!(options.cache_timeout, 300);
        assert_eq!(options.timeout_millis(), 300_000);
    }

    #[test]
    fn test_lookup_unset_uses_default() {
        let options = CacheOptions::from_lookup(|_| None).unwrap();
        assert_eq!(options, CacheOptions::default());
    }

    #[test]
    fn test_lookup_parses_seconds() {
        let options = CacheOptions::from_lookup(|_| Some(" 60 ".to_string())).unwrap();
        assert_eq!(options.cache_timeout, 60);
        assert_eq!(options.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let err = CacheOptions::from_lookup(|_| Some("soon".to_string())).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("Invalid environment variable CATALOG_CACHE_TIMEOUT")
        );
    }

    #[test]
    fn test_huge_timeout_saturates() {
        let options = CacheOptions {
            cache_timeout: u64::MAX,
        };
        assert_eq!(options.timeout_millis(), i64::MAX);
    }
}
