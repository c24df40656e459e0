// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Repejo Webhook Receiver Service
//!
//! Accepts webhooks from the Repejo donations platform, verifies their
//! signature and age, and answers with the normalized event batch.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables (a `.env` file is
//! honoured):
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `WEBHOOK_PATH`: Webhook route (default: /webhook)
//! - `REPEJO_EVENTS`: Comma-separated event types to emit (default: all)
//! - `REPEJO_WEBHOOK_SECRET`: HMAC secret (default: empty, no verification)
//! - `REPEJO_VALIDATE_SIGNATURE`: Check signatures (default: true)
//! - `METRICS_ENABLED` / `METRICS_PATH`: Prometheus endpoint (default: on, /metrics)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use repejo_webhook::{
    config::Config,
    handlers::{router, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env first so it can set RUST_LOG
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let mut subscribed: Vec<String> = config
        .validation
        .subscribed_events
        .iter()
        .map(ToString::to_string)
        .collect();
    subscribed.sort();
    info!(
        bind_addr = %config.bind_addr,
        webhook_path = %config.webhook_path,
        validate_signature = config.validation.require_signature,
        secret_configured = config.validation.has_secret(),
        events = ?subscribed,
        "Starting Repejo webhook receiver"
    );

    let addr: SocketAddr = config.bind_addr.parse()?;

    // Create application state
    let state = Arc::new(AppState::new(config)?);

    let app = router(state);

    // Start server
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
