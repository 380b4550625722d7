//! One-time wait-then-initialize sequence run before serving requests.
//!
//! Both steps are strict: a database that never becomes reachable within the
//! wait budget, or a failed schema statement, aborts startup.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{info, warn};

use crate::db::{self, DbConfig};
use crate::error::{GuestbookError, Result};

const RETRY_INTERVAL: Duration = Duration::from_secs(2);

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    username TEXT NOT NULL,
    phone TEXT,
    place TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

/// Block until the database answers a trivial query, retrying every
/// [`RETRY_INTERVAL`] until `budget` is exhausted. At least one attempt is
/// always made.
pub async fn wait_for_db(config: &DbConfig, budget: Duration) -> Result<()> {
    let deadline = Instant::now() + budget;
    let mut attempt = 1u32;
    loop {
        match probe(config).await {
            Ok(()) => {
                info!(attempt, "database reachable");
                return Ok(());
            }
            Err(err) => {
                if Instant::now() >= deadline {
                    return Err(err);
                }
                warn!(attempt, error = %err, "database not reachable yet, retrying");
                sleep(RETRY_INTERVAL).await;
                attempt += 1;
            }
        }
    }
}

async fn probe(config: &DbConfig) -> Result<()> {
    let mut conn = db::connect(config).await?;
    let result = sqlx::query("SELECT 1").execute(&mut conn).await;
    db::close(conn).await;
    result.map_err(GuestbookError::Query)?;
    Ok(())
}

/// Create the `users` table if it does not exist. Safe to run on every
/// process start.
pub async fn ensure_schema(config: &DbConfig) -> Result<()> {
    let mut conn = db::connect(config).await?;
    let result = sqlx::query(CREATE_USERS_TABLE).execute(&mut conn).await;
    db::close(conn).await;
    result.map_err(GuestbookError::Query)?;
    info!("users table ensured");
    Ok(())
}
