//! Boot server
//!
//! Assembles the boot endpoints, the JSON API and optional static assets into
//! one router and serves it until shutdown is requested.

use crate::api::api_router;
use crate::error::ServerError;
use crate::http::boot_router;
use crate::state::AppState;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

/// HTTP server for network boot scripts, configs and the JSON API.
pub struct BootServer {
    state: AppState,
    assets_dir: Option<PathBuf>,
}

impl BootServer {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            assets_dir: None,
        }
    }

    /// Serve files from `dir` under `/assets`
    #[must_use]
    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = Some(dir.into());
        self
    }

    /// Builds the full router.
    pub fn router(&self) -> Router {
        let mut router = boot_router().nest("/v1", api_router());
        if let Some(dir) = &self.assets_dir {
            router = router.nest_service("/assets", ServeDir::new(dir));
        }

        router
            .layer(
                TraceLayer::new_for_http()
                    .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
            )
            .with_state(self.state.clone())
    }

    /// Binds `addr` and serves until `shutdown` completes.
    pub async fn serve<F>(self, addr: SocketAddr, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr).await?;
        self.serve_listener(listener, shutdown).await
    }

    /// Serves on an already bound listener until `shutdown` completes.
    pub async fn serve_listener<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        info!("Boot server listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Boot server stopped");
        Ok(())
    }
}
