//! picrelayd - OneDrive image relay server
//!
//! Validates the environment configuration, wires the Graph workflows
//! into the router and serves the API until SIGINT or SIGTERM.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use picrelay_core::config::Config;
use picrelay_server::router::create_router;
use picrelay_server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    info!("Starting picrelayd");

    let config = Config::from_env();
    let violations = config.validate();
    if !violations.is_empty() {
        for violation in &violations {
            error!(field = %violation.field, "{}", violation.message);
        }
        anyhow::bail!("Invalid configuration ({} problems)", violations.len());
    }

    tokio::fs::create_dir_all(&config.server.upload_tmp_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create spool directory {}",
                config.server.upload_tmp_dir.display()
            )
        })?;

    let state = Arc::new(AppState::new(&config));
    let router = create_router(state, &config.server.cors_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(addr = %listener.local_addr()?, "Picrelay listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Picrelay shut down cleanly");
    Ok(())
}

/// Resolves when SIGINT or SIGTERM is received
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
