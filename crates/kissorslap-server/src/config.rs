//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use kissorslap_shared::constants::{
    DEFAULT_ACTION_FEE, DEFAULT_CANDIDATE_LIMIT, DEFAULT_HTTP_PORT, DEFAULT_LEADERBOARD_PAGE_SIZE,
    DEFAULT_STARTING_POINTS,
};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// SQLite database file. Created with its parent directory if missing.
    /// Env: `DATABASE_PATH`
    /// Default: `./kissorslap.db`
    pub database_path: PathBuf,

    /// Points charged for every KISS or SLAP submission.
    /// Env: `ACTION_FEE`
    pub action_fee: i64,

    /// Balance given to a user on first authentication.
    /// Env: `STARTING_POINTS`
    pub starting_points: i64,

    /// Upper bound for `GET /candidates?limit=`.
    /// Env: `CANDIDATE_LIMIT`
    pub candidate_limit: u32,

    /// Env: `LEADERBOARD_PAGE_SIZE`
    pub leaderboard_page_size: u32,

    /// Admin API bearer token. Required to access /admin/* endpoints.
    /// Env: `ADMIN_TOKEN`
    /// Default: empty (admin API disabled).
    pub admin_token: Option<String>,

    /// Sustained requests per second per client IP.
    /// Env: `RATE_LIMIT_RPS`
    pub rate_limit_rps: f64,

    /// Env: `RATE_LIMIT_BURST`
    pub rate_limit_burst: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            database_path: PathBuf::from("./kissorslap.db"),
            action_fee: DEFAULT_ACTION_FEE,
            starting_points: DEFAULT_STARTING_POINTS,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            leaderboard_page_size: DEFAULT_LEADERBOARD_PAGE_SIZE,
            admin_token: None,
            rate_limit_rps: 10.0,
            rate_limit_burst: 30.0,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        parse_into(&lookup, "HTTP_ADDR", &mut config.http_addr);

        if let Some(path) = lookup("DATABASE_PATH") {
            if !path.trim().is_empty() {
                config.database_path = PathBuf::from(path);
            }
        }

        parse_into(&lookup, "ACTION_FEE", &mut config.action_fee);
        if config.action_fee < 0 {
            tracing::warn!(value = config.action_fee, "Negative ACTION_FEE, using default");
            config.action_fee = DEFAULT_ACTION_FEE;
        }
        parse_into(&lookup, "STARTING_POINTS", &mut config.starting_points);
        parse_into(&lookup, "CANDIDATE_LIMIT", &mut config.candidate_limit);
        parse_into(&lookup, "LEADERBOARD_PAGE_SIZE", &mut config.leaderboard_page_size);

        if let Some(token) = lookup("ADMIN_TOKEN") {
            if !token.is_empty() {
                config.admin_token = Some(token);
            }
        }

        parse_into(&lookup, "RATE_LIMIT_RPS", &mut config.rate_limit_rps);
        parse_into(&lookup, "RATE_LIMIT_BURST", &mut config.rate_limit_burst);

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

/// Overwrite `slot` with the parsed variable, or warn and keep the default.
fn parse_into<T, F>(lookup: &F, key: &str, slot: &mut T)
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *slot = value,
        Err(_) => tracing::warn!(key, value = %raw, "Invalid value, using default"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8080).into());
        assert_eq!(config.action_fee, 10);
        assert_eq!(config.starting_points, 100);
        assert!(config.admin_token.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HTTP_ADDR", "127.0.0.1:9000"),
            ("DATABASE_PATH", "/tmp/kos/test.db"),
            ("ACTION_FEE", "25"),
            ("CANDIDATE_LIMIT", "5"),
            ("ADMIN_TOKEN", "s3cret"),
        ]);
        assert_eq!(config.http_addr, ([127, 0, 0, 1], 9000).into());
        assert_eq!(config.database_path, PathBuf::from("/tmp/kos/test.db"));
        assert_eq!(config.action_fee, 25);
        assert_eq!(config.candidate_limit, 5);
        assert_eq!(config.admin_token.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("HTTP_ADDR", "not-an-addr"),
            ("ACTION_FEE", "-3"),
            ("STARTING_POINTS", "lots"),
            ("ADMIN_TOKEN", ""),
        ]);
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8080).into());
        assert_eq!(config.action_fee, 10);
        assert_eq!(config.starting_points, 100);
        assert!(config.admin_token.is_none());
    }
}
