use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use guestbook::{routes, AppState};
use guestbook_core::config::Config;
use guestbook_core::startup;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Guestbook web form server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Wait for the database, ensure the schema, then serve HTTP
    Serve,
    /// Create the users table if absent, then exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // RUST_LOG wins; the debug flag only picks the fallback verbosity.
    let fallback = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve => serve(config).await,
        Command::Migrate => {
            startup::ensure_schema(&config.db)
                .await
                .context("failed to ensure the users table")?;
            Ok(())
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    startup::wait_for_db(&config.db, config.startup_wait)
        .await
        .context("database not reachable within the startup wait budget")?;
    startup::ensure_schema(&config.db)
        .await
        .context("failed to ensure the users table")?;

    let bind_addr = config.bind_addr.clone();
    let app = routes::router(Arc::new(AppState { config }));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service())
        .await
        .context("server shutdown")?;

    Ok(())
}
