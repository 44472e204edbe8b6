//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Address of the backing redis server
    pub redis_url: String,
    /// Lifetime of cached entries
    pub ttl: Duration,
    /// Maximum number of cached entries
    pub capacity: usize,
    /// Deadline for each inbound request
    pub request_timeout: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Unparseable or zero values fall back to the default.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `REDIS_URL` - Backing redis address (default: redis://127.0.0.1:6379)
    /// - `CACHE_TTL_SECS` - Entry lifetime in seconds (default: 3600)
    /// - `CACHE_CAPACITY` - Maximum cached entries (default: 1000000)
    /// - `REQUEST_TIMEOUT_SECS` - Per-request deadline in seconds (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: positive_var("SERVER_PORT").unwrap_or(defaults.server_port),
            redis_url: env::var("REDIS_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.redis_url),
            ttl: positive_var("CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.ttl),
            capacity: positive_var("CACHE_CAPACITY").unwrap_or(defaults.capacity),
            request_timeout: positive_var("REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }
}

/// Reads a numeric variable, ignoring values that do not parse or are zero.
fn positive_var<T>(name: &str) -> Option<T>
where
    T: FromStr + PartialEq + Default,
{
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .filter(|v: &T| *v != T::default())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            ttl: Duration::from_secs(3600),
            capacity: 1_000_000,
            request_timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.ttl, Duration::from_secs(3600));
        assert_eq!(config.capacity, 1_000_000);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    // Single test touching the environment so parallel tests cannot race on it
    #[test]
    fn test_config_from_env() {
        let vars = [
            "SERVER_PORT",
            "REDIS_URL",
            "CACHE_TTL_SECS",
            "CACHE_CAPACITY",
            "REQUEST_TIMEOUT_SECS",
        ];
        for var in vars {
            env::remove_var(var);
        }

        let config = Config::from_env();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.capacity, 1_000_000);

        env::set_var("SERVER_PORT", "9090");
        env::set_var("REDIS_URL", "redis://cache-backend:6380");
        env::set_var("CACHE_TTL_SECS", "60");
        env::set_var("CACHE_CAPACITY", "0");
        env::set_var("REQUEST_TIMEOUT_SECS", "not-a-number");

        let config = Config::from_env();
        assert_eq!(config.server_port, 9090);
        assert_eq!(config.redis_url, "redis://cache-backend:6380");
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.capacity, 1_000_000, "zero capacity falls back");
        assert_eq!(config.request_timeout, Duration::from_secs(5));

        for var in vars {
            env::remove_var(var);
        }
    }
}
