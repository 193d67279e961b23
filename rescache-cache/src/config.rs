//! Cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use rescache_core::constants::{DEFAULT_FRESHNESS_WINDOW_MS, FRESHNESS_WINDOW_ENV};
use rescache_core::error::{CacheError, Result};

/// Cache configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum entry age in milliseconds; entries this old or older are stale
    pub freshness_window_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            freshness_window_ms: DEFAULT_FRESHNESS_WINDOW_MS,
        }
    }
}

impl CacheConfig {
    /// Loads the configuration from the environment (and `.env`, if present).
    ///
    /// Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let raw = std::env::var(FRESHNESS_WINDOW_ENV).ok();
        Ok(Self {
            freshness_window_ms: parse_window(raw.as_deref())?,
        })
    }

    /// Sets the freshness window.
    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window_ms = window.as_millis() as u64;
        self
    }

    /// Returns the freshness window.
    pub fn freshness_window(&self) -> Duration {
        Duration::from_millis(self.freshness_window_ms)
    }
}

fn parse_window(raw: Option<&str>) -> Result<u64> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_FRESHNESS_WINDOW_MS),
        Some(value) => value.parse().map_err(|_| {
            CacheError::ConfigError(format!(
                "{} must be a whole number of milliseconds, got {:?}",
                FRESHNESS_WINDOW_ENV, value
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_window() {
        let config = CacheConfig::default();
        assert_eq!(config.freshness_window_ms, 10_000);
        assert_eq!(config.freshness_window(), Duration::from_secs(10));
    }

    #[test]
    fn test_builder() {
        let config = CacheConfig::default().with_freshness_window(Duration::from_millis(100));
        assert_eq!(config.freshness_window_ms, 100);
    }

    #[test_case(None, 10_000 ; "unset")]
    #[test_case(Some(""), 10_000 ; "empty")]
    #[test_case(Some("250"), 250 ; "plain")]
    #[test_case(Some(" 0 "), 0 ; "padded zero")]
    fn test_parse_window(raw: Option<&str>, expected: u64) {
        assert_eq!(parse_window(raw).unwrap(), expected);
    }

    #[test_case("ten" ; "word")]
    #[test_case("-5" ; "negative")]
    #[test_case("1.5" ; "fractional")]
    fn test_parse_window_rejects(raw: &str) {
        let err = parse_window(Some(raw)).unwrap_err();
        assert!(matches!(err, CacheError::ConfigError(_)));
        assert!(err.to_string().contains(FRESHNESS_WINDOW_ENV));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: CacheConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CacheConfig::default());

        let config: CacheConfig = serde_json::from_str(r#"{"freshness_window_ms": 100}"#).unwrap();
        assert_eq!(config.freshness_window_ms, 100);
    }
}
