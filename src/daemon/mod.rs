//! Daemon lifecycle: restore, serve, sweep, snapshot.
//!
//! Startup restores the snapshot before the listener binds, so no request
//! sees a partially loaded store. Shutdown stops the sweep first and then
//! writes the snapshot.

pub mod http;
pub mod metrics;
pub mod services;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::DictConfig;
use http::AppState;
use services::kv::{CleanupScheduler, Store, persistence};

/// Runs the daemon until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Fails if the snapshot cannot be read, the listener cannot bind, or the
/// final snapshot cannot be written.
pub async fn run(config: DictConfig) -> Result<()> {
    let snapshot_path = config.persistence.snapshot_path.clone();
    let store = Store::new(config.expiration.policy());

    persistence::restore_into(&store, &snapshot_path)
        .with_context(|| format!("Failed to restore snapshot {}", snapshot_path.display()))?;

    let mut state = AppState::new(store.clone(), config.server.api_key.clone());
    match metrics::install() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!(error = %e, "Metrics disabled"),
    }
    metrics::set_record_count(store.len());

    let addr = config.server.listen_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    let scheduler = CleanupScheduler::start(store.clone(), config.expiration.cleanup_period());

    info!(
        %addr,
        records = store.len(),
        auth = config.server.api_key.is_some(),
        "dictkv listening"
    );

    let served = axum::serve(
        listener,
        http::router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server failed");

    scheduler.stop();

    // Snapshot even when the server errored, then report the server error
    let saved = persistence::save(&store, &snapshot_path)
        .with_context(|| format!("Failed to write snapshot {}", snapshot_path.display()));
    if let Err(e) = &saved {
        error!(error = %format!("{e:#}"), "Snapshot not saved");
    }

    served?;
    saved?;
    info!("dictkv stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
