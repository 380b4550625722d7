use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuestbookError {
    #[error("database unreachable: {0}")]
    Connectivity(#[source] sqlx::Error),

    #[error("database connect timed out after {seconds}s")]
    ConnectTimeout { seconds: u64 },

    #[error("database query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GuestbookError>;
