use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::{ConnectOptions, Connection, PgConnection};
use tracing::debug;

use crate::error::{GuestbookError, Result};

/// TLS policy for outgoing database connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SslMode {
    Disabled,
    Required,
}

impl FromStr for SslMode {
    type Err = GuestbookError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "disabled" => Ok(SslMode::Disabled),
            "required" => Ok(SslMode::Required),
            other => Err(GuestbookError::Config(format!(
                "unknown ssl mode '{other}' (expected 'disabled' or 'required')"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub ssl_mode: SslMode,
    pub ssl_ca_path: PathBuf,
    pub connect_timeout: Duration,
}

impl DbConfig {
    /// Connection options for a single outgoing connection. When TLS is
    /// required, the CA bundle is attached only if the configured path
    /// exists; otherwise the connection is encrypted without verification.
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database);

        match self.ssl_mode {
            SslMode::Disabled => options.ssl_mode(PgSslMode::Disable),
            SslMode::Required => {
                let options = options.ssl_mode(PgSslMode::Require);
                if self.ssl_ca_path.exists() {
                    options.ssl_root_cert(&self.ssl_ca_path)
                } else {
                    options
                }
            }
        }
    }
}

/// Open one new connection. Callers own the connection and release it by
/// dropping it (or via [`close`] for a graceful shutdown); connections are
/// never pooled or reused across requests.
pub async fn connect(config: &DbConfig) -> Result<PgConnection> {
    match tokio::time::timeout(config.connect_timeout, config.connect_options().connect()).await {
        Ok(Ok(conn)) => Ok(conn),
        Ok(Err(err)) => Err(GuestbookError::Connectivity(err)),
        Err(_) => Err(GuestbookError::ConnectTimeout {
            seconds: config.connect_timeout.as_secs(),
        }),
    }
}

/// Gracefully close a connection, ignoring shutdown errors.
pub async fn close(conn: PgConnection) {
    if let Err(err) = conn.close().await {
        debug!(error = %err, "error while closing database connection");
    }
}
