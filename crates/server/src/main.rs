//! blockscope API server
//!
//! Environment:
//!   BLOCKSCOPE_ADDR   - bind address (overrides `[server] bind`, default 0.0.0.0:8000)
//!   BLOCKSCOPE_CONFIG - config file path (default: .blockscope.toml)
//!   RUST_LOG          - log filter (default: info)

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use blockscope::config::Config;
use blockscope::AnalysisOrchestrator;
use blockscope_server::{create_router, AppState, InMemoryScanStore};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::var("BLOCKSCOPE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".blockscope.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("invalid config {}", config_path.display()))?;

    let registry = blockscope_rules::default_registry();
    let orchestrator = AnalysisOrchestrator::from_config(registry, &config)?;
    info!(rules = orchestrator.registry().len(), "rules loaded");

    let state = AppState::new(Arc::new(orchestrator), Arc::new(InMemoryScanStore::new()))
        .with_scan_timeout(Duration::from_secs(config.server.scan_timeout_secs));
    let app = create_router(state);

    let bind = std::env::var("BLOCKSCOPE_ADDR").unwrap_or(config.server.bind);
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address {bind}"))?;

    let listener = TcpListener::bind(addr).await?;
    info!("blockscope API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
