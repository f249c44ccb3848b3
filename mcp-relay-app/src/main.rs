use anyhow::{Context, Result};
use mcp_relay_app::{build, Config, Server};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::resolve(std::env::args_os().nth(1).map(PathBuf::from))
        .context("Failed to load configuration")?;
    let state = build(&config)?;

    let server = Server::start(state, config.socket_addr()?)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("mcp-relay serving on {}", server.addr());

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutting down");
    server.stop().await;
    Ok(())
}
