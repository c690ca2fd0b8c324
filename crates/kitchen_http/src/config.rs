//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `KITCHEN_DB_PATH` - SQLite file (default: kitchen.sqlite3)
//! - `KITCHEN_HOST` - Bind address (default: 127.0.0.1)
//! - `KITCHEN_PORT` - Listen port (default: 8000)
//! - `KITCHEN_PAGE_SIZE` - List page size, 1..=50 (default: 5)
//! - `KITCHEN_LOG_LEVEL` - trace|debug|info|warn|error (default: debug in
//!   debug builds, info in release builds)
//! - `KITCHEN_LOG_DIR` - Absolute log directory (default: `<temp>/kitchen-logs`)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use kitchen_core::{default_log_dir, default_log_level, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use thiserror::Error;

const DEFAULT_DB_PATH: &str = "kitchen.sqlite3";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    /// Items per list page.
    pub page_size: u32,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` naming the first bad variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let db_path = PathBuf::from(
            non_blank(lookup("KITCHEN_DB_PATH")).unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
        );
        let host = non_blank(lookup("KITCHEN_HOST"))
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("KITCHEN_HOST".to_string(), e.to_string()))?;
        let port = match non_blank(lookup("KITCHEN_PORT")) {
            Some(value) => value.parse::<u16>().map_err(|e| {
                ConfigError::InvalidEnvVar("KITCHEN_PORT".to_string(), e.to_string())
            })?,
            None => DEFAULT_PORT,
        };
        let page_size = match non_blank(lookup("KITCHEN_PAGE_SIZE")) {
            Some(value) => parse_page_size(&value)?,
            None => DEFAULT_PAGE_SIZE,
        };
        let log_level = non_blank(lookup("KITCHEN_LOG_LEVEL"))
            .unwrap_or_else(|| default_log_level().to_string());
        let log_dir = non_blank(lookup("KITCHEN_LOG_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(default_log_dir);

        Ok(Self {
            db_path,
            host,
            port,
            page_size,
            log_level,
            log_dir,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_page_size(value: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("KITCHEN_PAGE_SIZE".to_string(), reason);
    let size = value.parse::<u32>().map_err(|e| invalid(e.to_string()))?;
    if !(1..=MAX_PAGE_SIZE).contains(&size) {
        return Err(invalid(format!("must be between 1 and {MAX_PAGE_SIZE}")));
    }
    Ok(size)
}
