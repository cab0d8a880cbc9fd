//! Configuration Module
//!
//! Loads gateway configuration from environment variables once at startup.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Gateway configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection URL of the backing store
    pub redis_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Socket connect timeout for the store connection
    pub connect_timeout: Duration,
    /// Interval in seconds between connection health checks (0 disables them)
    pub health_check_interval: u64,
    /// Reconnection attempts made by the managed connection
    pub retries: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Store connection URL (required)
    /// - `PORT` - HTTP server port (default: 8080)
    /// - `REDIS_CONNECT_TIMEOUT_MS` - Connect timeout in milliseconds (default: 5000)
    /// - `REDIS_HEALTH_CHECK_INTERVAL` - Health check interval in seconds (default: 60)
    /// - `REDIS_RETRIES` - Reconnection attempts (default: 3)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let redis_url = match env::var("REDIS_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => bail!("REDIS_URL must be set to the store connection URL"),
        };

        let server_port = parse_var("PORT", defaults.server_port)?;
        let connect_timeout_ms = parse_var(
            "REDIS_CONNECT_TIMEOUT_MS",
            defaults.connect_timeout.as_millis() as u64,
        )?;

        Ok(Self {
            redis_url,
            server_port,
            connect_timeout: Duration::from_millis(connect_timeout_ms),
            health_check_interval: parse_var(
                "REDIS_HEALTH_CHECK_INTERVAL",
                defaults.health_check_interval,
            )?,
            retries: parse_var("REDIS_RETRIES", defaults.retries)?,
        })
    }
}

/// Parses `name` from the environment, falling back to `default` when it is
/// unset or empty. A value that does not parse is an error.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw:?}")),
        _ => Ok(default),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            server_port: 8080,
            connect_timeout: Duration::from_millis(5000),
            health_check_interval: 60,
            retries: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables are process-wide, so every env-driven case runs in
    // one test to avoid races between parallel tests.
    #[test]
    fn test_config_from_env() {
        env::remove_var("REDIS_URL");
        env::remove_var("PORT");
        env::remove_var("REDIS_CONNECT_TIMEOUT_MS");
        env::remove_var("REDIS_HEALTH_CHECK_INTERVAL");
        env::remove_var("REDIS_RETRIES");

        assert!(Config::from_env().is_err());

        env::set_var("REDIS_URL", "");
        assert!(Config::from_env().is_err());

        env::set_var("REDIS_URL", "redis://cache.internal:6379/0");
        let config = Config::from_env().unwrap();
        assert_eq!(config.redis_url, "redis://cache.internal:6379/0");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.connect_timeout, Duration::from_millis(5000));
        assert_eq!(config.health_check_interval, 60);
        assert_eq!(config.retries, 3);

        env::set_var("PORT", "9090");
        env::set_var("REDIS_HEALTH_CHECK_INTERVAL", "0");
        let config = Config::from_env().unwrap();
        assert_eq!(config.server_port, 9090);
        assert_eq!(config.health_check_interval, 0);

        env::set_var("PORT", "not-a-port");
        assert!(Config::from_env().is_err());
        env::remove_var("PORT");

        for name in [
            "REDIS_CONNECT_TIMEOUT_MS",
            "REDIS_HEALTH_CHECK_INTERVAL",
            "REDIS_RETRIES",
        ] {
            env::set_var(name, "soon");
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains(name), "{err}");
            env::remove_var(name);
        }

        env::set_var("REDIS_CONNECT_TIMEOUT_MS", "250");
        env::set_var("REDIS_RETRIES", "7");
        let config = Config::from_env().unwrap();
        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.retries, 7);

        env::remove_var("REDIS_CONNECT_TIMEOUT_MS");
        env::remove_var("REDIS_RETRIES");
        env::remove_var("REDIS_URL");
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.health_check_interval, 60);
        assert_eq!(config.retries, 3);
    }
}
