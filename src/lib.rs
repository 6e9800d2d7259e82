mod commands;
pub mod config;
mod error;
mod models;
pub(crate) mod scope_path;
mod services;
mod shell;
mod state;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use commands::{file_commands, git_commands, static_commands, tree_commands};
pub use config::Config;
use state::{AppState, SharedState};

/// Installs the global subscriber: `RUST_LOG` filtering (default `info`),
/// formatted to stderr.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route(
            "/api/tree",
            post(tree_commands::tree).get(tree_commands::full_tree),
        )
        .route("/api/load/{*filename}", get(file_commands::load_file))
        .route("/api/save", post(file_commands::save_file))
        .route("/api/create-file", post(file_commands::create_file))
        .route("/api/create-folder", post(file_commands::create_folder))
        .route("/api/branch", get(git_commands::base_branch))
        .route("/api/branch/{*root}", get(git_commands::branch))
        .route("/api/folders", post(file_commands::list_folders))
        .fallback(static_commands::serve_static)
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

/// Binds `host:port`. The host may be a name such as `localhost`; it is
/// resolved and the first address that binds wins.
async fn bind(config: &Config) -> anyhow::Result<TcpListener> {
    TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("binding {}:{}", config.host, config.port))
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let config = config.prepare()?;
    let listener = bind(&config).await?;
    tracing::info!(
        base_dir = %config.base_dir.display(),
        static_dir = %config.static_dir.display(),
        host = %config.host,
        port = config.port,
        "starting editor bridge"
    );

    let app = router(AppState::new(config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}
