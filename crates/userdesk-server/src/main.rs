use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use userdesk_server::app;
use userdesk_server::config::ServerConfig;
use userdesk_server::state::AppState;
use userdesk_storage::UserStore;

const DEFAULT_CONFIG_PATH: &str = "config/server.toml";

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  userdesk-server [config.toml]    Start the server (default: {DEFAULT_CONFIG_PATH})");
    eprintln!();
    eprintln!("Environment overrides: HOST, PORT, CORS_ORIGIN, DATABASE_URL, DATA_DIR, RUST_LOG");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("userdesk=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(|s| s.as_str()) {
        Some("--help" | "-h") => {
            print_usage();
            Ok(())
        }
        other => run_server(other.unwrap_or(DEFAULT_CONFIG_PATH)).await,
    }
}

async fn run_server(config_path: &str) -> Result<()> {
    let config = ServerConfig::load_or_default(config_path)
        .with_context(|| format!("failed to load config '{config_path}'"))?;

    tracing::info!(
        http_host = %config.http_host,
        http_port = config.http_port,
        data_dir = %config.database.data_dir,
        db = %config.database.redacted_url(),
        cors = ?config.cors_allowed_origins,
        "userdesk-server starting"
    );

    let db_url = config.database.connection_url();
    let store = Arc::new(UserStore::open(&db_url, Path::new(&config.database.data_dir)).await?);

    let state = AppState {
        users: store.clone(),
        config: Arc::new(config.clone()),
    };

    let http_addr: SocketAddr = format!("{}:{}", config.http_host, config.http_port)
        .parse()
        .context("invalid listen address")?;
    let app = app::build_http_app(state);
    let listener = tokio::net::TcpListener::bind(http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;

    tracing::info!(http = %http_addr, "Server started");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    if let Err(e) = &served {
        tracing::error!(error = %e, "HTTP server error");
    }

    if let Err(e) = store.close().await {
        tracing::error!(error = %e, "Failed to close user store");
    }
    tracing::info!("Server stopped");

    served.map_err(Into::into)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutting down gracefully");
}
