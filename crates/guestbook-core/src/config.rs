use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::db::{DbConfig, SslMode};
use crate::error::{GuestbookError, Result};

/// Process-wide settings, loaded once at startup and passed explicitly to
/// whatever needs them. Never consulted as ambient global state.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub secret_key: String,
    pub debug: bool,
    /// Startup wait budget for the initial reachability loop.
    pub startup_wait: Duration,
    pub db: DbConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(vars: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db = DbConfig {
            host: string_var(&vars, "DB_HOST", "localhost"),
            port: parsed_var(&vars, "DB_PORT", 5432)?,
            user: string_var(&vars, "DB_USER", "postgres"),
            password: string_var(&vars, "DB_PASSWORD", "postgres"),
            database: string_var(&vars, "DB_NAME", "guestbook"),
            ssl_mode: parsed_var(&vars, "DB_SSL_MODE", SslMode::Disabled)?,
            ssl_ca_path: PathBuf::from(string_var(&vars, "DB_SSL_CA", "/etc/ssl/rds-ca.pem")),
            connect_timeout: Duration::from_secs(parsed_var(&vars, "DB_CONNECT_TIMEOUT", 10)?),
        };

        Ok(Self {
            bind_addr: string_var(&vars, "BIND_ADDR", "0.0.0.0:5000"),
            secret_key: string_var(&vars, "SECRET_KEY", "dev-secret-change-me"),
            debug: flag_var(&vars, "DEBUG"),
            startup_wait: Duration::from_secs(parsed_var(&vars, "DB_STARTUP_WAIT", 60)?),
            db,
        })
    }
}

fn string_var(vars: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    vars(key).unwrap_or_else(|| default.to_string())
}

fn parsed_var<T>(vars: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match vars(key) {
        Some(raw) => raw
            .parse()
            .map_err(|err| GuestbookError::Config(format!("{key}: {err}"))),
        None => Ok(default),
    }
}

fn flag_var(vars: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    matches!(
        vars(key).as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.db.host, "localhost");
        assert_eq!(config.db.port, 5432);
        assert_eq!(config.db.user, "postgres");
        assert_eq!(config.db.database, "guestbook");
        assert_eq!(config.db.ssl_mode, SslMode::Disabled);
        assert_eq!(config.db.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.startup_wait, Duration::from_secs(60));
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert!(!config.debug);
    }

    #[test]
    fn environment_values_override_defaults() {
        let config = load(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6432"),
            ("DB_SSL_MODE", "required"),
            ("DB_STARTUP_WAIT", "5"),
            ("DEBUG", "true"),
        ])
        .unwrap();
        assert_eq!(config.db.host, "db.internal");
        assert_eq!(config.db.port, 6432);
        assert_eq!(config.db.ssl_mode, SslMode::Required);
        assert_eq!(config.startup_wait, Duration::from_secs(5));
        assert!(config.debug);
    }

    #[test]
    fn malformed_port_is_a_config_error() {
        let err = load(&[("DB_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, GuestbookError::Config(_)));
    }

    #[test]
    fn malformed_ssl_mode_is_a_config_error() {
        let err = load(&[("DB_SSL_MODE", "prefer")]).unwrap_err();
        assert!(matches!(err, GuestbookError::Config(_)));
    }

    #[test]
    fn debug_flag_accepts_common_truthy_spellings() {
        for value in ["1", "true", "YES", "True"] {
            assert!(load(&[("DEBUG", value)]).unwrap().debug, "value: {value}");
        }
        for value in ["0", "false", "no", ""] {
            assert!(!load(&[("DEBUG", value)]).unwrap().debug, "value: {value}");
        }
    }
}
