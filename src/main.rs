// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CleanStreet API Server
//!
//! Accepts civic issue reports from citizens and lets administrators
//! triage them.

use anyhow::Context;
use cleanstreet::{config::Config, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(port = config.port, "Starting CleanStreet API");

    let state = AppState::new(config.clone()).context("Failed to initialize application state")?;
    tracing::info!(upload_dir = %config.upload_dir.display(), "Upload storage ready");

    if state.bootstrap_admin()?.is_none() {
        tracing::warn!("ADMIN_EMAIL not set; no administrator account exists");
    }

    // Build router
    let app = cleanstreet::routes::create_router(Arc::new(state));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cleanstreet=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
