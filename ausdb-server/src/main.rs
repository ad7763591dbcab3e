//! Auscultation database server - Main entry point
//!
//! Loads the heart and breath sound datasets into memory, then serves the
//! browse/filter API and the dataset files themselves. Loading must finish
//! before the listener binds; a load failure aborts startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ausdb_server::api;
use ausdb_server::{breath, heart};

/// Command-line arguments for ausdb-server
#[derive(Parser, Debug)]
#[command(name = "ausdb-server")]
#[command(about = "Browsing and filtering service for auscultation sound datasets")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "7860", env = "PORT")]
    port: u16,

    /// Folder containing the heart-data and breath-data dataset trees
    #[arg(short, long)]
    data_folder: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ausdb_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command-line arguments
    let args = Args::parse();

    let data_folder = ausdb_common::config::resolve_data_folder(
        args.data_folder.as_deref().and_then(|p| p.to_str()),
        "AUSDB_DATA_FOLDER",
    )
    .context("Failed to resolve data folder")?;

    info!("Starting AusDB server on port {}", args.port);
    info!("Data folder: {}", data_folder.display());

    let heart_data_dir = data_folder.join("heart-data");
    let breath_data_dir = data_folder.join("breath-data");

    // Both datasets load fully before the listener binds; requests can never
    // observe a partially built collection
    let (heart_repo, breath_repo) = tokio::try_join!(
        heart::data::load(&heart_data_dir),
        breath::data::load(&breath_data_dir),
    )
    .context("Failed to load datasets")?;

    let app_state = api::AppState {
        heart: Arc::new(heart_repo),
        breath: Arc::new(breath_repo),
        heart_data_dir,
        breath_data_dir,
    };

    let app = api::create_router(app_state);

    // Create socket address
    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
