//! tallyd server binary.

use anyhow::{Context, Result};
use clap::Parser;
use tally_server::{AppState, Cli, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("tallyd v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.into_config();
    let temp_root = config.temp_root();
    if !temp_root.is_dir() {
        anyhow::bail!("temp directory {} does not exist", temp_root.display());
    }
    tracing::info!(
        tool = %config.tool.program,
        args = ?config.tool.args,
        timeout = ?config.tool.timeout,
        temp_root = %temp_root.display(),
        "analysis tool configured"
    );

    let bind = config.bind;
    let app = create_router(AppState::from_config(config));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(addr = %listener.local_addr()?, "listening; POST a ZIP archive to /analyze");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
