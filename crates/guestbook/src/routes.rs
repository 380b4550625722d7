use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;
use tracing::error;

use guestbook_core::db;
use guestbook_core::entries::{self, NewEntry, UserEntry};
use guestbook_core::error::Result;

use crate::render::{self, Notice};
use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct IndexParams {
    notice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    place: String,
}

// Notice codes carried across the POST redirect, one render only.
const NOTICE_SAVED: &str = "saved";
const NOTICE_USERNAME_REQUIRED: &str = "username_required";
const NOTICE_SAVE_FAILED: &str = "save_failed";

fn notice_for_code(code: &str) -> Option<Notice> {
    match code {
        NOTICE_SAVED => Some(Notice::success("Entry saved.")),
        NOTICE_USERNAME_REQUIRED => Some(Notice::error("Username must not be empty.")),
        NOTICE_SAVE_FAILED => Some(Notice::error("Could not save entry.")),
        _ => None,
    }
}

fn redirect_with_notice(code: &str) -> Redirect {
    Redirect::to(&format!("/?notice={code}"))
}

async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IndexParams>,
) -> Html<String> {
    let (rows, notice) = match fetch_entries(&state).await {
        Ok(rows) => {
            let notice = params.notice.as_deref().and_then(notice_for_code);
            (rows, notice)
        }
        Err(err) => {
            error!(error = %err, "failed to load entries");
            (Vec::new(), Some(Notice::error("Could not load entries.")))
        }
    };
    Html(render::page(&rows, notice.as_ref()))
}

async fn submit(State(state): State<Arc<AppState>>, Form(form): Form<SubmitForm>) -> Redirect {
    let entry = match NewEntry::from_submission(&form.username, &form.phone, &form.place) {
        Ok(entry) => entry,
        Err(_) => return redirect_with_notice(NOTICE_USERNAME_REQUIRED),
    };

    match store_entry(&state, &entry).await {
        Ok(()) => redirect_with_notice(NOTICE_SAVED),
        Err(err) => {
            error!(error = %err, username = %entry.username, "failed to save entry");
            redirect_with_notice(NOTICE_SAVE_FAILED)
        }
    }
}

async fn fetch_entries(state: &AppState) -> Result<Vec<UserEntry>> {
    let mut conn = db::connect(&state.config.db).await?;
    let rows = entries::list(&mut conn).await;
    db::close(conn).await;
    rows
}

async fn store_entry(state: &AppState, entry: &NewEntry) -> Result<()> {
    let mut conn = db::connect(&state.config.db).await?;
    let result = entries::insert(&mut conn, entry).await;
    db::close(conn).await;
    result
}
