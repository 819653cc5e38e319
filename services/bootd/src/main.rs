//! Boot Daemon
//!
//! Serves iPXE and GRUB2 boot configs to network-booting machines. Each
//! machine is matched to a group by the labels it reports and receives the
//! boot config of that group's profile.
//!
//! Profiles, groups and config blobs are read from `BOOTD_DATA_DIR`, or kept
//! in memory and managed through the `/v1` API when no data directory is set.

mod config;
mod error;

use boot_core::GrubRenderer;
use boot_server::{AppState, BootServer};
use boot_store::{BootStore, FileStore, MemoryStore};
use config::Config;
use error::DaemonError;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), DaemonError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting boot daemon");

    let config = Config::from_env()?;
    info!("Configuration:");
    info!("  Address: {}", config.address);
    info!(
        "  Data dir: {}",
        config
            .data_dir
            .as_ref()
            .map_or_else(|| "none (in-memory store)".to_string(), |d| d.display().to_string())
    );
    if let Some(dir) = &config.assets_dir {
        info!("  Assets dir: {}", dir.display());
    }

    let store: Arc<dyn BootStore> = match &config.data_dir {
        Some(dir) => Arc::new(FileStore::new(dir)),
        None => {
            warn!("No BOOTD_DATA_DIR set, profiles and groups will not persist");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store)?.with_grub(GrubRenderer::new().with_title(&config.grub_title));
    let mut server = BootServer::new(state);
    if let Some(dir) = &config.assets_dir {
        server = server.with_assets_dir(dir);
    }

    server.serve(config.address, shutdown_signal()).await?;
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C"),
        () = terminate => info!("Received SIGTERM"),
    }
    info!("Shutting down");
}
