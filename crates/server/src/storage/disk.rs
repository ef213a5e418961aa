//! REST client for the remote disk storage.
//!
//! Talks to a Yandex-Disk-compatible API: resource metadata lookups,
//! folder creation, and two-step uploads (request an upload URL, then PUT
//! the file bytes to it).

use std::path::Path;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::{RemoteStore, UploadError};

/// Disk API base URL.
const API_BASE: &str = "https://cloud-api.yandex.net/v1/disk";

/// Authenticated client for the remote disk API.
#[derive(Clone)]
pub struct DiskClient {
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UploadTarget {
    href: String,
}

impl DiskClient {
    /// Create a client authenticated with the given OAuth token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the token is
    /// not a valid header value.
    pub fn new(token: &SecretString) -> Result<Self, UploadError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("OAuth {}", token.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value).map_err(|e| UploadError::Api {
            status: 0,
            message: format!("invalid token format: {e}"),
        })?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self { client })
    }

    async fn api_error(response: reqwest::Response) -> UploadError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        UploadError::Api { status, message }
    }
}

impl RemoteStore for DiskClient {
    async fn exists(&self, path: &str) -> Result<bool, UploadError> {
        let response = self
            .client
            .get(format!("{API_BASE}/resources"))
            .query(&[("path", path)])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn mkdir(&self, path: &str) -> Result<(), UploadError> {
        let response = self
            .client
            .put(format!("{API_BASE}/resources"))
            .query(&[("path", path)])
            .send()
            .await?;

        // 409 means the folder already exists, which is fine.
        if response.status().is_success() || response.status() == StatusCode::CONFLICT {
            return Ok(());
        }
        Err(Self::api_error(response).await)
    }

    async fn upload(&self, local: &Path, remote: &str) -> Result<(), UploadError> {
        // Step 1: ask the API for a one-shot upload URL.
        let response = self
            .client
            .get(format!("{API_BASE}/resources/upload"))
            .query(&[("path", remote), ("overwrite", "true")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        let target: UploadTarget = response.json().await?;

        // Step 2: PUT the file bytes to it.
        let bytes = tokio::fs::read(local).await?;
        let response = self.client.put(&target.href).body(bytes).send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(())
    }
}
