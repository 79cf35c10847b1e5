// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Lead Intake Service
//!
//! Receives the contact, quote and GDPR forms of the studio website.
//!
//! ## Endpoints
//!
//! - `POST /api/contact`: 5 requests per hour per client (default)
//! - `POST /api/gdpr`: 3 requests per 24 hours per client (default)
//! - `POST /api/quote`: priced and forwarded to the automation webhook
//! - `GET /health`, `GET /healthz`, `GET /metrics`
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `CONTACT_MAX_REQUESTS`, `CONTACT_WINDOW_MS`: contact form quota
//! - `GDPR_MAX_REQUESTS`, `GDPR_WINDOW_MS`: GDPR form quota
//! - `RATE_LIMIT_CAPACITY`: record count that triggers the expiry sweep
//! - `TRUST_PROXY_HEADERS`: key clients by `X-Forwarded-For` (default: false)
//! - `MAIL_API_URL`, `MAIL_API_KEY`, `MAIL_FROM`, `MAIL_TO`, `GDPR_MAIL_TO`
//! - `QUOTE_WEBHOOK_URL`: automation endpoint for quotes (optional)
//! - `OUTBOUND_TIMEOUT_MS`: timeout for email and webhook calls
//! - `METRICS_ENABLED`, `METRICS_PATH`

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lead_intake::{
    config::Config,
    handlers::{router, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        contact_max_requests = config.rate_limit.contact.max_requests,
        contact_window_ms = config.rate_limit.contact.window_ms,
        gdpr_max_requests = config.rate_limit.gdpr.max_requests,
        gdpr_window_ms = config.rate_limit.gdpr.window_ms,
        trust_proxy_headers = config.rate_limit.trust_proxy_headers,
        mail_enabled = config.mail.api_key.is_some(),
        webhook_enabled = config.webhook.quote_url.is_some(),
        "Starting lead intake service"
    );

    let addr: SocketAddr = config.bind_addr.parse()?;
    let state = Arc::new(AppState::from_config(config)?);
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
