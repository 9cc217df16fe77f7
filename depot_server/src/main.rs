//! Main entry point for the file depot server binary

use anyhow::Result;
use depot_core::{create_app, run_server, AppConfig, AppState, FileManager, HttpFetcher, StagingArea};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    info!("Configuration loaded successfully");
    info!("Server will bind to: {}", config.bind_address());
    info!("Upload folder: {}", config.files.upload_dir.display());

    config.create_directories()
        .map_err(|e| anyhow::anyhow!("Failed to create directories: {}", e))?;

    let addr: SocketAddr = config.bind_address().parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    let fetcher = HttpFetcher::new(
        config.download.timeout().unwrap_or(Duration::from_secs(300)),
        &config.download.user_agent,
    )
    .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

    let file_manager = FileManager::new(
        config.files.to_manager_config(&config.download),
        Arc::new(fetcher),
    );
    file_manager.initialize().await
        .map_err(|e| anyhow::anyhow!("Failed to initialize file manager: {}", e))?;

    let staging = StagingArea::new(&config.files.staging_dir);
    staging.initialize().await
        .map_err(|e| anyhow::anyhow!("Failed to initialize staging area: {}", e))?;

    let state = AppState::new(file_manager, staging)
        .with_search_roots(config.files.search_roots.clone());

    info!("App: {} v{}", state.app_name, state.version);
    info!(
        "Accepting uploads up to {} KB with extensions: {}",
        config.files.max_file_size_kb,
        config.files.allowed_extensions.join(", ")
    );

    let app = create_app(state);

    run_server(app, addr).await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            let default_level = if cfg!(debug_assertions) {
                "debug"
            } else {
                "info"
            };

            format!(
                "{}={},depot_core={},tower_http=debug",
                env!("CARGO_CRATE_NAME").replace('-', "_"),
                default_level,
                default_level
            ).into()
        });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let is_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init();
    }
}
