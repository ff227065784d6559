//! `boatsync serve`

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

use boatsync::app::App;
use boatsync::config::Config;

/// Command-line overrides for the server
pub struct ServeParams {
    pub bind: Option<SocketAddr>,
    pub static_dir: Option<PathBuf>,
    pub refresh_interval: Option<u64>,
    pub enable_cors: bool,
}

/// Start the HTTP server and run until Ctrl+C
pub async fn serve(mut config: Config, params: ServeParams) -> Result<()> {
    let ServeParams {
        bind,
        static_dir,
        refresh_interval,
        enable_cors,
    } = params;

    if let Some(bind) = bind {
        config.server.bind_address = bind;
    }
    if static_dir.is_some() {
        config.server.static_dir = static_dir;
    }
    if refresh_interval.is_some() {
        config.sync.refresh_interval_secs = refresh_interval;
    }
    config.server.enable_cors &= enable_cors;

    let bind_address = config.server.bind_address;
    let app = App::from_config(config)?;
    let server = app.server().context("Failed to create server")?;

    println!("{}", server.info().display());
    println!();
    println!("API Endpoints:");
    println!("  GET  /api/boats            - Cached boats (?refresh=true to resync)");
    println!("  GET  /api/boats/{{id}}       - Boat detail from the catalog");
    println!("  GET  /api/status           - Sync progress");
    println!("  POST /api/sync             - Start a sync");
    println!("  GET  /api/stats            - Price and year statistics");
    println!("  GET  /api/health           - Health check");
    println!("  GET  /metrics              - Prometheus metrics endpoint");
    println!();
    println!("Listening on http://{bind_address}");
    println!("Press Ctrl+C to stop.\n");

    server
        .start_with_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                }
                Err(e) => {
                    tracing::error!("Failed to wait for Ctrl+C: {}", e);
                }
            }
        })
        .await?;

    println!("Server stopped.");
    Ok(())
}
