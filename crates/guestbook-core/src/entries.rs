use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::prelude::FromRow;
use sqlx::PgConnection;

use crate::error::{GuestbookError, Result};

/// One stored guestbook submission.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct UserEntry {
    pub id: i64,
    pub username: String,
    pub phone: Option<String>,
    pub place: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A validated submission, ready to insert. Only producible through
/// [`NewEntry::from_submission`], so a stored username is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub username: String,
    pub phone: Option<String>,
    pub place: Option<String>,
}

impl NewEntry {
    /// Trim a raw form submission. An empty username is rejected before any
    /// storage is touched; empty phone/place become NULL.
    pub fn from_submission(username: &str, phone: &str, place: &str) -> Result<Self> {
        let username = username.trim();
        if username.is_empty() {
            return Err(GuestbookError::Validation(
                "username must not be empty".into(),
            ));
        }
        Ok(Self {
            username: username.to_string(),
            phone: optional(phone),
            place: optional(place),
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Insert one row. The id and creation timestamp are assigned by Postgres.
pub async fn insert(conn: &mut PgConnection, entry: &NewEntry) -> Result<()> {
    sqlx::query("INSERT INTO users (username, phone, place) VALUES ($1, $2, $3)")
        .bind(&entry.username)
        .bind(&entry.phone)
        .bind(&entry.place)
        .execute(&mut *conn)
        .await
        .map_err(GuestbookError::Query)?;
    Ok(())
}

/// All rows, newest first.
pub async fn list(conn: &mut PgConnection) -> Result<Vec<UserEntry>> {
    sqlx::query_as::<_, UserEntry>(
        "SELECT id, username, phone, place, created_at FROM users ORDER BY id DESC",
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(GuestbookError::Query)
}
