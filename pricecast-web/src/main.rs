//! pricecast-web - Product price prediction service
//!
//! Loads the product catalog and the three price models once at startup,
//! then serves the HTML form and JSON API. Any startup failure (config,
//! dataset or model) aborts before the listener is bound.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pricecast_common::config::ConfigResolver;
use pricecast_common::Pipeline;
use pricecast_web::api::BuildInfo;
use pricecast_web::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "pricecast-web")]
#[command(about = "Product price prediction web service")]
#[command(version)]
struct Args {
    /// Config file (otherwise PRICECAST_CONFIG, ./pricecast.toml, user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides server.bind
    #[arg(short, long, env = "PRICECAST_BIND")]
    bind: Option<String>,

    /// Product CSV, overrides dataset.path
    #[arg(short, long, env = "PRICECAST_DATASET")]
    dataset: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config first: it supplies the default log level
    let loaded = ConfigResolver::new(args.config)
        .load()
        .context("Failed to load configuration")?;
    let source = loaded.source;
    let mut config = loaded.config;

    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(dataset) = args.dataset {
        config.dataset.path = dataset;
    }
    config.validate().context("Invalid configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    // Build identification immediately after tracing init
    info!("Starting pricecast-web {}", BuildInfo::current());
    info!("Configuration: {}", source);

    let pipeline = Pipeline::from_config(&config).context("Failed to load catalog and models")?;
    let catalog = pipeline.catalog();
    info!(
        "✓ Loaded {} products from {}",
        catalog.len(),
        config.dataset.path.display()
    );
    if catalog.skipped_rows() > 0 {
        warn!(
            "Skipped {} rows with malformed prices",
            catalog.skipped_rows()
        );
    }
    info!("✓ Loaded {} models", pipeline.models().iter().count());

    let state = AppState::new(pipeline);
    let app = build_router(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("pricecast-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
