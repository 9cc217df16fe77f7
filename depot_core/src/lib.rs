//! Local file management, remote fetch-and-cache, and the HTTP upload intake.

pub mod config;
pub mod error;
pub mod files;
pub mod handlers;
pub mod middleware;
pub mod models;

pub use config::AppConfig;
pub use error::{DepotError, Result};
pub use files::{
    FileManager, FileManagerConfig, HttpFetcher, RemoteFetcher, StagingArea, UploadDescriptor,
    WriteMode,
};
pub use handlers::routes::create_routes;

use axum::{extract::DefaultBodyLimit, Router};
use middleware::logging;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Slack on top of the upload limit for multipart framing.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub file_manager: FileManager,
    pub staging: StagingArea,
    pub search_roots: Vec<PathBuf>,
}

impl AppState {
    /// Wires the staging area in as the manager's upload trust check.
    pub fn new(file_manager: FileManager, staging: StagingArea) -> Self {
        let file_manager = file_manager.with_origin(Arc::new(staging.clone()));

        Self {
            app_name: "File Depot".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            file_manager,
            staging,
            search_roots: Vec::new(),
        }
    }

    pub fn with_search_roots(mut self, search_roots: Vec<PathBuf>) -> Self {
        self.search_roots = search_roots;
        self
    }
}

pub fn create_app(state: AppState) -> Router {
    let max_upload_kb = state.file_manager.config().max_allowed_file_size;
    let body_limit = usize::try_from(max_upload_kb.saturating_mul(1024))
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .merge(create_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(logging::make_request_span)
                .on_request(logging::log_request)
                .on_response(logging::log_response)
                .on_failure(logging::log_failure),
        )
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| DepotError::Other(anyhow::anyhow!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| DepotError::Other(anyhow::anyhow!("Server error: {}", e)))?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
