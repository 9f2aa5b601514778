//! Video storage: uploads a video and hands back a publicly fetchable URL.

use async_trait::async_trait;
use bytes::Bytes;
use dropbox_client::DropboxClient;
use tracing::{error, info, instrument};

use crate::core::{BotError, Result};

use super::fetch_bytes;

/// What to upload: bytes already in memory, or a URL to fetch first.
#[derive(Debug, Clone)]
pub enum UploadSource {
    Bytes(Bytes),
    Url(String),
}

/// Object storage for uploaded videos.
#[async_trait]
pub trait VideoStorage: Send + Sync {
    /// Stores `content` as `name` and returns a public direct-download URL.
    ///
    /// Every call creates a new object, even when a later step of the call fails.
    async fn upload(&self, content: UploadSource, name: &str) -> Result<String>;
}

/// Dropbox-backed [`VideoStorage`]; objects land under `upload_dir`.
pub struct DropboxStorage {
    client: DropboxClient,
    http: reqwest::Client,
    upload_dir: String,
}

impl DropboxStorage {
    pub fn new(client: DropboxClient, http: reqwest::Client, upload_dir: impl Into<String>) -> Self {
        Self {
            client,
            http,
            upload_dir: upload_dir.into(),
        }
    }

    fn destination(&self, name: &str) -> String {
        format!(
            "{}/{}",
            self.upload_dir.trim_end_matches('/'),
            name.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl VideoStorage for DropboxStorage {
    #[instrument(skip(self, content))]
    async fn upload(&self, content: UploadSource, name: &str) -> Result<String> {
        let bytes = match content {
            UploadSource::Bytes(bytes) => bytes,
            UploadSource::Url(url) => fetch_bytes(&self.http, &url).await.map_err(|e| {
                error!(error = %e, "Fetching upload source failed");
                BotError::Upload(format!("fetching source failed: {}", e))
            })?,
        };

        let path = self.destination(name);
        info!(path = %path, size = bytes.len(), "step: storage upload");
        let url = self
            .client
            .upload_and_share(&path, bytes)
            .await
            .map_err(|e| {
                error!(error = %e, path = %path, "Dropbox upload failed");
                BotError::Upload(e.to_string())
            })?;
        info!(path = %path, url = %url, "step: storage upload done");
        Ok(url)
    }
}
