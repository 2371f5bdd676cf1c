//! Endpoint configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Log filtering is controlled separately
//! through `RUST_LOG`.

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ServerError;

/// Address the endpoint binds to when `LISTEN_ADDR` is not set.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";

/// Top-level endpoint configuration.
///
/// Loaded once at startup via [`ServerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind the listener to (e.g. `127.0.0.1:8000`).
    pub listen_addr: SocketAddr,

    /// Interval between keepalive pings on an idle connection.
    /// `None` disables keepalive pings.
    pub ping_interval: Option<Duration>,

    /// How long to wait for the peer's close reply after the server
    /// sends a close frame.
    pub close_timeout: Duration,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to the [`Default`] values when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] if `LISTEN_ADDR` is set but cannot
    /// be parsed as a [`SocketAddr`].
    pub fn from_env() -> Result<Self, ServerError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from `lookup`, which maps a variable name
    /// to its value.
    ///
    /// Numeric values that are missing or malformed fall back to their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] if `LISTEN_ADDR` is present but cannot
    /// be parsed as a [`SocketAddr`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr: SocketAddr = raw_addr
            .parse()
            .map_err(|e| ServerError::Config(format!("LISTEN_ADDR `{raw_addr}`: {e}")))?;

        let ping_interval_secs: u64 = parse_value(lookup("PING_INTERVAL_SECS"), 7);
        let ping_interval =
            (ping_interval_secs > 0).then(|| Duration::from_secs(ping_interval_secs));

        let close_timeout = Duration::from_secs(parse_value(lookup("CLOSE_TIMEOUT_SECS"), 5));

        let log_json = lookup("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json"));

        Ok(Self {
            listen_addr,
            ping_interval,
            close_timeout,
            log_json,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            ping_interval: Some(Duration::from_secs(7)),
            close_timeout: Duration::from_secs(5),
            log_json: false,
        }
    }
}

/// Parses a raw variable value as `T`, returning `default` on missing
/// or invalid values.
fn parse_value<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn default_matches_documented_values() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
        assert_eq!(config.ping_interval, Some(Duration::from_secs(7)));
        assert_eq!(config.close_timeout, Duration::from_secs(5));
        assert!(!config.log_json);
    }

    #[test]
    fn parse_value_falls_back_on_missing_value() {
        let value: u64 = parse_value(None, 42);
        assert_eq!(value, 42);
    }

    #[test]
    fn empty_lookup_yields_defaults() {
        let Ok(config) = ServerConfig::from_lookup(|_| None) else {
            panic!("defaults should load");
        };
        assert_eq!(config.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
        assert_eq!(config.ping_interval, Some(Duration::from_secs(7)));
        assert_eq!(config.close_timeout, Duration::from_secs(5));
        assert!(!config.log_json);
    }

    #[test]
    fn reads_every_variable() {
        let lookup = lookup_in(&[
            ("LISTEN_ADDR", "0.0.0.0:9001"),
            ("PING_INTERVAL_SECS", "0"),
            ("CLOSE_TIMEOUT_SECS", "2"),
            ("LOG_FORMAT", "JSON"),
        ]);
        let Ok(config) = ServerConfig::from_lookup(lookup) else {
            panic!("valid values should load");
        };
        assert_eq!(config.listen_addr, SocketAddr::from(([0, 0, 0, 0], 9001)));
        assert_eq!(config.ping_interval, None);
        assert_eq!(config.close_timeout, Duration::from_secs(2));
        assert!(config.log_json);
    }

    #[test]
    fn unparseable_listen_addr_is_a_config_error() {
        let outcome = ServerConfig::from_lookup(lookup_in(&[("LISTEN_ADDR", "not-an-addr")]));
        let Err(ServerError::Config(message)) = outcome else {
            panic!("expected a config error");
        };
        assert!(message.contains("not-an-addr"));
    }

    #[test]
    fn malformed_numbers_fall_back_to_defaults() {
        let lookup = lookup_in(&[
            ("PING_INTERVAL_SECS", "soon"),
            ("CLOSE_TIMEOUT_SECS", "-3"),
        ]);
        let Ok(config) = ServerConfig::from_lookup(lookup) else {
            panic!("malformed numbers should not fail loading");
        };
        assert_eq!(config.ping_interval, Some(Duration::from_secs(7)));
        assert_eq!(config.close_timeout, Duration::from_secs(5));
    }
}
