//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FIELDOWL_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to the generic `DATABASE_URL`)
//!
//! ## Optional
//! - `FIELDOWL_HOST` - Bind address (default: 127.0.0.1)
//! - `FIELDOWL_PORT` - Listen port (default: 5000)
//! - `FIELDOWL_BASE_URL` - Public URL, used to decide whether session
//!   cookies are marked Secure (default: `http://localhost:5000`)
//! - `FIELDOWL_DISK_TOKEN` - OAuth token for the remote disk; when absent
//!   every generated document is written to the local reports directory
//! - `FIELDOWL_REMOTE_FOLDER` - Destination folder on the remote disk
//!   (default: fieldowl-reports)
//! - `FIELDOWL_REPORTS_DIR` - Local fallback directory (default: reports)
//! - `FIELDOWL_INITIAL_BALANCE` - Balance granted on registration
//!   (default: 10000)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Document storage configuration
    pub storage: StorageConfig,
    /// Balance granted to newly registered accounts
    pub initial_balance: i64,
}

/// Document storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// OAuth token for the remote disk; `None` disables the remote path
    pub disk_token: Option<SecretString>,
    /// Destination folder on the remote disk
    pub remote_folder: String,
    /// Local fallback directory for generated documents
    pub local_reports_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("FIELDOWL_DATABASE_URL")?;
        let host = get_env_or_default("FIELDOWL_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("FIELDOWL_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("FIELDOWL_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("FIELDOWL_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("FIELDOWL_BASE_URL", "http://localhost:5000");
        let initial_balance = get_env_or_default("FIELDOWL_INITIAL_BALANCE", "10000")
            .parse::<i64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("FIELDOWL_INITIAL_BALANCE".to_string(), e.to_string())
            })?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            storage: StorageConfig::from_env(),
            initial_balance,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StorageConfig {
    fn from_env() -> Self {
        Self {
            disk_token: get_optional_env("FIELDOWL_DISK_TOKEN").map(SecretString::from),
            remote_folder: get_env_or_default("FIELDOWL_REMOTE_FOLDER", "fieldowl-reports"),
            local_reports_dir: PathBuf::from(get_env_or_default("FIELDOWL_REPORTS_DIR", "reports")),
        }
    }
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
