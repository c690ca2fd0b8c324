//! Application state shared across handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kitchen_core::open_db;
use kitchen_core::model::page::normalize_page_size;
use rusqlite::Connection;

use crate::config::ServerConfig;
use crate::error::{ApiError, Result};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds no open connection: every request
/// opens its own on a blocking worker thread.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    db_path: PathBuf,
    page_size: u32,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(db_path: impl Into<PathBuf>, page_size: u32) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db_path: db_path.into(),
                page_size: normalize_page_size(Some(page_size)),
            }),
        }
    }

    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.db_path.clone(), config.page_size)
    }

    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.inner.db_path
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.inner.page_size
    }

    /// Runs `f` with a fresh, migrated connection on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns the error of `f`, a `Database` error when the connection
    /// cannot be opened, or `Internal` when the worker panicked.
    pub async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self.inner.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = open_db(&db_path)?;
            f(&conn)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("database worker failed: {err}")))?
    }
}
