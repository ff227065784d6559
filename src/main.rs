use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use boatsync::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "boatsync",
    version,
    about = "Mirror a remote boat catalog into memory and serve it over HTTP",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (defaults to BOATSYNC_* environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the configuration
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the catalog API and keep the cache in sync
    Serve {
        /// Address to listen on
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        /// Frontend build directory
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Re-sync every N seconds
        #[arg(long)]
        refresh_interval: Option<u64>,

        /// Disable CORS headers
        #[arg(long, default_value = "false")]
        no_cors: bool,
    },

    /// Run one sync and print a summary
    Sync {
        /// Override the page size
        #[arg(short, long)]
        page_size: Option<usize>,

        /// Write the synced boats to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch one boat from the catalog
    Detail {
        /// Boat identifier
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    if let Err(e) = boatsync::metrics::init_metrics() {
        tracing::warn!("Metrics initialization failed: {}", e);
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "boatsync starting");

    match cli.command {
        Commands::Serve {
            bind,
            static_dir,
            refresh_interval,
            no_cors,
        } => {
            tracing::info!(
                bind = ?bind,
                static_dir = ?static_dir,
                refresh_interval = ?refresh_interval,
                "Starting serve command"
            );
            commands::serve(
                config,
                commands::ServeParams {
                    bind,
                    static_dir,
                    refresh_interval,
                    enable_cors: !no_cors,
                },
            )
            .await?;
        }

        Commands::Sync { page_size, output } => {
            tracing::info!(page_size = ?page_size, output = ?output, "Starting sync command");
            commands::sync_once(config, page_size, output).await?;
        }

        Commands::Detail { id } => {
            tracing::info!(id = %id, "Starting detail command");
            commands::detail(config, &id).await?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { level };
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!("boatsync={level},tower_http={level},warn"))
            .with_context(|| format!("Invalid log level: {level}"))?,
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    Ok(())
}
