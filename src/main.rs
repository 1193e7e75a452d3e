// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::Context;
use clap::Parser;
use ogp_proxy::app::{create_router, AppState, VERSION};
use ogp_proxy::models::config::AppConfig;
use ogp_proxy::services::logging::init_tracing;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::parse();
    init_tracing();

    let state = AppState::from_config(&config).context("Failed to build upstream HTTP client")?;
    tracing::info!(
        "Header policy: {}, fetch timeout: {:?}",
        config.header_policy,
        config.fetch_timeout()
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!("ogp-proxy v{} listening on {}", VERSION, config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
