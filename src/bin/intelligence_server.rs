//! `intelligence-server`: HTTP front end for the dispatch engine.

use ai_intelligence::config::ServerConfig;
use ai_intelligence::engine::Engine;
use ai_intelligence::provider::{Credentials, ProviderAdapter};
use ai_intelligence::server;
use ai_intelligence::service::ServiceRegistry;
use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let registry = Arc::new(ServiceRegistry::new());
    registry
        .load(&config.config_path)
        .await
        .with_context(|| format!("failed to load '{}'", config.config_path.display()))?;

    let credentials = Credentials::from_env(&registry.providers())
        .context("missing provider credentials")?;
    let adapter = ProviderAdapter::builder()
        .credentials(credentials)
        .timeout(config.http_timeout())
        .build()?;

    let _watcher = if config.watch {
        Some(registry.watch(&config.config_path, adapter.credentials().clone())?)
    } else {
        None
    };

    let engine = Engine::new(Arc::clone(&registry), adapter);
    let app = server::router(engine, config.max_body_bytes);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    info!(%addr, services = registry.len(), watch = config.watch, "intelligence server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failure")?;

    info!("intelligence server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for ctrl-c; shutting down");
    }
    info!("received shutdown signal");
}
