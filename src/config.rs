//! Configuration Module
//!
//! Handles loading and validating server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Longest TTL a store will apply; larger values are capped to this.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// == Cache Config ==
/// Knobs fixed at store construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries held at the end of any write
    pub max_capacity: usize,
    /// Lifetime of every entry, measured from its last write
    pub ttl: Duration,
    /// Whether a successful lookup also pushes the deadline out by `ttl`
    pub refresh_ttl_on_get: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 100,
            ttl: Duration::from_secs(300),
            refresh_ttl_on_get: false,
        }
    }
}

// == Server Config ==
/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// TTL in seconds applied to every entry
    pub entry_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Interval in seconds between expiry sweeps
    pub sweep_interval: u64,
    /// Whether GET extends an entry's TTL
    pub refresh_ttl_on_get: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 100)
    /// - `ENTRY_TTL_SECS` - TTL in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `SWEEP_INTERVAL_SECS` - Sweep frequency in seconds (default: 1)
    /// - `REFRESH_TTL_ON_GET` - `true`/`1` to extend TTL on reads (default: false)
    ///
    /// Unset or unparseable variables fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            entry_ttl: env_or("ENTRY_TTL_SECS", defaults.entry_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            sweep_interval: env_or("SWEEP_INTERVAL_SECS", defaults.sweep_interval),
            refresh_ttl_on_get: env::var("REFRESH_TTL_ON_GET")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.refresh_ttl_on_get),
        }
    }

    /// Rejects values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entries == 0 {
            return Err(ConfigError::OutOfRange {
                name: "MAX_ENTRIES",
                reason: "must hold at least one entry",
            });
        }
        if self.entry_ttl == 0 {
            return Err(ConfigError::OutOfRange {
                name: "ENTRY_TTL_SECS",
                reason: "must be at least one second",
            });
        }
        if self.entry_ttl > MAX_TTL.as_secs() {
            return Err(ConfigError::OutOfRange {
                name: "ENTRY_TTL_SECS",
                reason: "must not exceed one hundred years",
            });
        }
        if self.sweep_interval == 0 {
            return Err(ConfigError::OutOfRange {
                name: "SWEEP_INTERVAL_SECS",
                reason: "must be at least one second",
            });
        }
        Ok(())
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_capacity: self.max_entries,
            ttl: Duration::from_secs(self.entry_ttl),
            refresh_ttl_on_get: self.refresh_ttl_on_get,
        }
    }

    pub fn sweep_period(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 100,
            entry_ttl: 300,
            server_port: 8080,
            sweep_interval: 1,
            refresh_ttl_on_get: false,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_entries, 100);
        assert_eq!(config.entry_ttl, 300);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.sweep_interval, 1);
        assert!(!config.refresh_ttl_on_get);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cache_config_matches_default_store_config() {
        assert_eq!(Config::default().cache_config(), CacheConfig::default());
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let zero_entries = Config {
            max_entries: 0,
            ..Config::default()
        };
        assert!(matches!(
            zero_entries.validate(),
            Err(ConfigError::OutOfRange { name: "MAX_ENTRIES", .. })
        ));

        let zero_ttl = Config {
            entry_ttl: 0,
            ..Config::default()
        };
        assert!(zero_ttl.validate().is_err());

        let huge_ttl = Config {
            entry_ttl: u64::MAX,
            ..Config::default()
        };
        assert!(matches!(
            huge_ttl.validate(),
            Err(ConfigError::OutOfRange { name: "ENTRY_TTL_SECS", .. })
        ));

        let max_ttl = Config {
            entry_ttl: MAX_TTL.as_secs(),
            ..Config::default()
        };
        assert!(max_ttl.validate().is_ok());

        let zero_sweep = Config {
            sweep_interval: 0,
            ..Config::default()
        };
        assert!(zero_sweep.validate().is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        env::set_var("TTL_LRU_CACHE_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or("TTL_LRU_CACHE_TEST_GARBAGE", 7u64), 7);

        env::set_var("TTL_LRU_CACHE_TEST_NUMBER", " 42 ");
        assert_eq!(env_or("TTL_LRU_CACHE_TEST_NUMBER", 7u64), 42);

        assert_eq!(env_or("TTL_LRU_CACHE_TEST_UNSET", 7u64), 7);
    }
}
