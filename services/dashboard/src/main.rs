//! EventDesk dashboard server
//!
//! Serves the HR/vendor scheduling dashboard on top of the upstream event API.

use std::sync::Arc;

use anyhow::{Context, Result};
use eventdesk_dashboard::{
    api,
    config::{Config, LogFormat},
    guard::GuardPolicy,
    session::CookieSettings,
    state::AppState,
    upstream::ApiClient,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing (prefer RUST_LOG, fallback to EVENTDESK_LOG_LEVEL)
    let registry = tracing_subscriber::registry().with(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into()),
    );
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
    }

    info!("Starting eventdesk dashboard");
    info!(
        listen_addr = %config.listen_addr,
        api_url = %config.api_url,
        upstream_timeout_ms = config.upstream_timeout.as_millis() as u64,
        "Configuration loaded"
    );

    let upstream = ApiClient::new(&config.api_url, config.upstream_timeout)
        .context("Failed to create upstream client")?;

    let cookies = CookieSettings {
        name: config.session_cookie.clone(),
        secure: config.secure_cookies,
    };
    let state = AppState::new(Arc::new(upstream), GuardPolicy::default(), cookies);

    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %config.listen_addr, "Listening for connections");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Dashboard shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
