//! albumrate-gw - HTTP gateway for album search, ratings and comments
//!
//! Configuration priority: command line / environment, then the TOML config
//! file, then compiled defaults. A `.env` file in the working directory is
//! loaded before arguments are parsed.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use albumrate_common::config::{Config, ConfigOverrides};
use albumrate_gw::services::CatalogClient;
use albumrate_gw::{build_router, AppState};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for albumrate-gw
#[derive(Parser, Debug)]
#[command(name = "albumrate-gw")]
#[command(about = "HTTP gateway for album search, ratings and comments")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "ALBUMRATE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "ALBUMRATE_BIND")]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// SQLite connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Catalog OAuth client id
    #[arg(long, env = "SPOTIFY_CLIENT_ID")]
    client_id: Option<String>,

    /// Catalog OAuth client secret
    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// Log filter used when RUST_LOG is unset (e.g. "debug")
    #[arg(long, env = "ALBUMRATE_LOG")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind_addr: self.bind.clone(),
            port: self.port,
            database_url: self.database_url.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is normal outside development
    let dotenv_path = dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    config.apply_overrides(&args.overrides());

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{},tower_http=info", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting albumrate-gw v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if let Some(path) = dotenv_path {
        info!("Loaded environment from {}", path.display());
    }

    config.validate().context("Invalid configuration")?;

    let db = albumrate_gw::db::open(&config.database).await?;
    info!("✓ Connected to database");

    if !config.catalog.has_credentials() {
        warn!("Catalog credentials not configured; /api and /albumpage will fail");
    }
    let catalog = CatalogClient::new(config.catalog.clone())
        .context("Failed to create catalog client")?;

    let state = AppState::new(db.clone(), Arc::new(catalog));
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.bind_addr, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                config.server.bind_addr, config.server.port
            )
        })?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("albumrate-gw listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
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
