//! Cabinet server binary.

use anyhow::{Context, Result};
use cabinet_core::config::AppConfig;
use cabinet_server::{AppState, create_router};
use cabinet_sessions::{MemorySessionCache, SessionCache, spawn_cleanup_task};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Cabinet - a small personal file store
#[derive(Parser, Debug)]
#[command(name = "cabinet-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "CABINET_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Startup banner
    tracing::info!("Cabinet v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration. Every setting has a working default, so both the
    // file and the environment overrides are optional.
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();

    if config_path.exists() {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}, using defaults", args.config);
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("CABINET_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    config.validate().context("invalid configuration")?;

    // Initialize blob storage
    let blobs = cabinet_storage::from_config(&config.storage)
        .context("failed to initialize storage")?;
    blobs
        .health_check()
        .await
        .context("storage health check failed")?;
    tracing::info!("Storage backend initialized");

    // Initialize metadata store and apply the schema
    let metadata = cabinet_metadata::from_config(&config.metadata)
        .await
        .context("failed to initialize metadata store")?;
    metadata
        .migrate()
        .await
        .context("failed to apply metadata schema")?;
    tracing::info!("Metadata store initialized");

    // Session cache with periodic eviction of expired tokens
    let session_cache: Arc<dyn SessionCache> = Arc::new(MemorySessionCache::new());

    // Create application state
    let state = AppState::new(config, metadata, blobs, session_cache.clone());

    let cleanup_interval = state.session_cleanup_interval();
    let _cleanup_handle = spawn_cleanup_task(session_cache, cleanup_interval);
    tracing::info!(
        interval_secs = cleanup_interval.as_secs(),
        "Session cleanup task spawned"
    );

    // Create router
    let app = create_router(state.clone());

    // Parse bind address
    let addr: SocketAddr = state
        .config
        .server
        .bind
        .parse()
        .context("invalid bind address")?;

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
