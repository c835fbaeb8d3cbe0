//! Application configuration loaded from environment variables.

use std::time::Duration;

use order_store::ConnectOptions;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `DATABASE_URL`: PostgreSQL connection string; in-memory stores when unset
/// - `DB_CONNECT_TIMEOUT_SECS`: bound on the initial connection (default: `10`)
/// - `DB_MAX_CONNECTIONS`: pool size (default: `5`)
/// - `SESSION_COOKIE`: name of the session cookie (default: `"session-name"`)
/// - `SESSION_SEED`: JSON object of `token -> session` registered at startup
///   when running on in-memory stores (default: none)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub db_connect_timeout: Duration,
    pub db_max_connections: u32,
    pub session_cookie: String,
    pub session_seed: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: get("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: get("DATABASE_URL").filter(|url| !url.is_empty()),
            db_connect_timeout: get("DB_CONNECT_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.db_connect_timeout),
            db_max_connections: get("DB_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.db_max_connections),
            session_cookie: get("SESSION_COOKIE")
                .filter(|name| !name.is_empty())
                .unwrap_or(defaults.session_cookie),
            session_seed: get("SESSION_SEED").filter(|seed| !seed.trim().is_empty()),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the pool options for the PostgreSQL store.
    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            max_connections: self.db_max_connections,
            connect_timeout: self.db_connect_timeout,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            db_connect_timeout: Duration::from_secs(10),
            db_max_connections: 5,
            session_cookie: "session-name".to_string(),
            session_seed: None,
        }
    }
}
