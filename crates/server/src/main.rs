use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tunefeed_core::{
    load_config, validate_config, Config, HttpRecommender, Recommender, SpotifyClient,
    TrackCatalog,
};
use tunefeed_server::api::create_router;
use tunefeed_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("TUNEFEED_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration; every key has a default, so a missing file just
    // means defaults plus env overrides.
    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        info!("No config file at {:?}, using defaults", config_path);
        Config::default()
    };

    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Recommendation sidecar: {}", config.recommender.base_url);
    info!("Catalog API: {}", config.catalog.base_url);

    // Create clients
    let recommender: Arc<dyn Recommender> = Arc::new(
        HttpRecommender::new(&config.recommender)
            .context("Failed to create recommender client")?,
    );
    let catalog: Arc<dyn TrackCatalog> =
        Arc::new(SpotifyClient::new(&config.catalog).context("Failed to create catalog client")?);

    // Probe the sidecar once at startup. It is supervised externally, so an
    // unreachable sidecar is worth a warning but not fatal: the pipeline
    // falls back to provider recommendations until it comes up.
    match recommender.health().await {
        Ok(()) => info!("Recommendation sidecar is up"),
        Err(e) => warn!("Recommendation sidecar unreachable: {}", e),
    }

    // Create app state and router
    let state = Arc::new(AppState::new(config.clone(), recommender, catalog));
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
