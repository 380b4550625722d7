use guestbook_core::config::Config;

pub mod render;
pub mod routes;

/// Shared handler state: the immutable settings snapshot loaded at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}
