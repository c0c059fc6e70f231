use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sessionauth_backend::{
    auth::spawn_cleanup_task,
    config::{LogSettings, Settings},
    router, AppState,
};
use tokio::net::TcpListener;
use tokio::time::interval;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Session-based auth server
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,
}

fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let registry = tracing_subscriber::registry().with(filter);

    if log.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    if let Some(port) = cli.port {
        settings.server.port = port;
    }

    init_tracing(&settings.log);

    let addr = settings.bind_addr()?;
    let cleanup_every = settings.cleanup_interval();
    let state = Arc::new(AppState::from_settings(settings).context("failed to open stores")?);

    // Sweep expired sessions in the background
    let _session_cleanup = spawn_cleanup_task(state.sessions.clone(), cleanup_every);

    // Forget expired login lockouts every hour
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = interval(std::time::Duration::from_secs(60 * 60));
        loop {
            interval.tick().await;
            rate_limiter.cleanup();
        }
    });

    let app = router::create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        // serve until killed
        std::future::pending::<()>().await;
    }
}
