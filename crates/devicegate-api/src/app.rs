//! Application builder: wires store, persistence, state and router into a
//! running server.

use std::sync::Arc;

use axum::Router;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use devicegate_auth::{MemorySessionStore, SessionStore, SnapshotPersister, StoreHealth};
use devicegate_core::config::AppConfig;
use devicegate_core::error::AppError;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the DeviceGate server until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!(
        max_devices = config.session.max_devices.max(),
        persistence = config.persistence.enabled,
        "Starting DeviceGate server..."
    );

    // ── Step 1: Session store ────────────────────────────────────
    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let health = Arc::new(if config.persistence.enabled {
        StoreHealth::new(config.persistence.fail_closed)
    } else {
        StoreHealth::in_memory()
    });

    // ── Step 2: Restore snapshot ─────────────────────────────────
    let persister = if config.persistence.enabled {
        let persister = Arc::new(SnapshotPersister::new(
            Arc::clone(&store),
            Arc::clone(&health),
            &config.persistence,
            config.session.max_devices,
        ));
        persister.restore().await?;
        Some(persister)
    } else {
        info!("Session persistence disabled; sessions will not survive a restart");
        None
    };

    // ── Step 3: Shutdown channel & persister task ────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let persister_handle = persister.map(|persister| {
        let cancel = shutdown_rx.clone();
        tokio::spawn(async move {
            persister.run(cancel).await;
        })
    });

    // ── Step 4: Build and start HTTP server ──────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(Arc::new(config), store, health);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(addr = %addr, "DeviceGate server listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await;

    // ── Step 5: Final snapshot ───────────────────────────────────
    if let Some(handle) = persister_handle {
        if let Err(e) = handle.await {
            error!(error = %e, "Snapshot persister task failed");
        }
    }

    served.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
    info!("DeviceGate server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
