use anyhow::{Context, Result};
use axum::Router;
use resource_api::ResourceApiModule;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

/// Resource routes wrapped in per-request tracing spans.
#[must_use]
pub fn app(module: &ResourceApiModule) -> Router {
    module.router().layer(TraceLayer::new_for_http())
}

/// Serve until Ctrl+C or SIGTERM, then drain in-flight requests.
///
/// # Errors
/// Module initialization, bind or serve failures.
pub async fn run(config: AppConfig) -> Result<()> {
    let module = ResourceApiModule::from_config(&config.resource_api).await?;

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(%address, "storefront server listening");

    axum::serve(listener, app(&module))
        .with_graceful_shutdown(wait_for_shutdown())
        .await
        .context("server error")?;

    tracing::info!("storefront server stopped");
    Ok(())
}

async fn wait_for_shutdown() {
    tokio::select! {
        () = wait_ctrl_c() => {},
        () = wait_sigterm() => {},
    }
    tracing::info!("Shutdown signal received, initiating graceful shutdown");
}

async fn wait_ctrl_c() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(%e, "Error handling Ctrl+C signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn wait_sigterm() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut handler) => {
            handler.recv().await;
        }
        Err(e) => {
            tracing::error!(%e, "Failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_sigterm() {
    std::future::pending::<()>().await;
}
