//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::render::AskamaRenderer;
use crate::storage::{DiskClient, StorageUploader, UploadError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    uploader: StorageUploader<DiskClient>,
    renderer: AskamaRenderer,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Builds the remote disk client when a token is configured; without
    /// one the uploader runs in local-fallback mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the disk client cannot be constructed.
    pub fn new(config: AppConfig, pool: PgPool) -> Result<Self, UploadError> {
        let remote = match &config.storage.disk_token {
            Some(token) => Some(DiskClient::new(token)?),
            None => {
                tracing::warn!("no disk token configured, documents will be stored locally");
                None
            }
        };
        let uploader = StorageUploader::new(
            remote,
            config.storage.remote_folder.clone(),
            config.storage.local_reports_dir.clone(),
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                uploader,
                renderer: AskamaRenderer::new(),
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the document uploader.
    #[must_use]
    pub fn uploader(&self) -> &StorageUploader<DiskClient> {
        &self.inner.uploader
    }

    /// Get a reference to the document renderer.
    #[must_use]
    pub fn renderer(&self) -> &AskamaRenderer {
        &self.inner.renderer
    }
}
