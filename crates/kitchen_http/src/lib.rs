//! JSON-over-HTTP adapter for the kitchen staff service.
//!
//! Handlers stay thin: decode the request, resolve the current cook, then
//! call one `kitchen_core` use-case on a per-request SQLite connection.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;

use kitchen_core::{open_db, DbError};
use log::{info, warn};
use thiserror::Error;

/// Failure to start or run the server.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("database error: {0}")]
    Database(#[from] DbError),
    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Migrates the database, binds the configured address and serves until
/// Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns `ServeError` if the database cannot be opened or migrated, or the
/// listener fails.
pub async fn serve(config: ServerConfig) -> Result<(), ServeError> {
    let db_path = config.db_path.clone();
    tokio::task::spawn_blocking(move || open_db(&db_path).map(drop))
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))??;

    let app = router(AppState::from_config(&config));
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "event=server_start module=http status=ok addr={addr} db_path={} page_size={}",
        config.db_path.display(),
        config.page_size
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=http status=ok");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("event=signal_install module=http status=error signal=ctrl_c error={err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("event=signal_install module=http status=error signal=sigterm error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("event=shutdown_signal module=http status=ok");
}
