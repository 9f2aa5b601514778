//! # Dropbox client
//!
//! Minimal Dropbox HTTP API v2 wrapper: upload a file, create (or reuse) a shared link,
//! and turn the shared link into a directly fetchable URL.

use bytes::Bytes;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

pub const DROPBOX_API_BASE: &str = "https://api.dropboxapi.com";
pub const DROPBOX_CONTENT_BASE: &str = "https://content.dropboxapi.com";

/// Dropbox client. Cheap to clone; the underlying HTTP client is shared.
#[derive(Debug, Clone)]
pub struct DropboxClient {
    client: Client,
    access_token: String,
    api_base: String,
    content_base: String,
}

#[derive(Debug, Serialize)]
struct UploadArg<'a> {
    path: &'a str,
    mode: &'a str,
    autorename: bool,
    mute: bool,
}

#[derive(Debug, Deserialize)]
struct FileMetadata {
    #[serde(default)]
    path_display: Option<String>,
    #[serde(default)]
    path_lower: Option<String>,
}

#[derive(Debug, Serialize)]
struct PathArg<'a> {
    path: &'a str,
}

#[derive(Debug, Serialize)]
struct ListSharedLinksArg<'a> {
    path: &'a str,
    direct_only: bool,
}

#[derive(Debug, Deserialize)]
struct SharedLinkMetadata {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ListSharedLinksResult {
    #[serde(default)]
    links: Vec<SharedLinkMetadata>,
}

impl DropboxClient {
    pub fn new(access_token: String) -> Self {
        Self::with_base_urls(
            access_token,
            DROPBOX_API_BASE.to_string(),
            DROPBOX_CONTENT_BASE.to_string(),
        )
    }

    /// Client with custom RPC and content endpoints (used to point at a mock server).
    pub fn with_base_urls(access_token: String, api_base: String, content_base: String) -> Self {
        Self {
            client: Client::new(),
            access_token,
            api_base: api_base.trim_end_matches('/').to_string(),
            content_base: content_base.trim_end_matches('/').to_string(),
        }
    }

    /// Uploads `contents` to `path` (mode `add`, autorename) and returns the stored path.
    #[instrument(skip(self, contents), fields(size = contents.len()))]
    pub async fn upload(&self, path: &str, contents: Bytes) -> anyhow::Result<String> {
        let arg = serde_json::to_string(&UploadArg {
            path,
            mode: "add",
            autorename: true,
            mute: true,
        })?;

        info!(path = %path, "step: dropbox upload request");
        let response = self
            .client
            .post(format!("{}/2/files/upload", self.content_base))
            .bearer_auth(&self.access_token)
            .header("Dropbox-API-Arg", arg)
            .header("Content-Type", "application/octet-stream")
            .body(contents)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Dropbox upload error ({}): {}", status, error_text);
        }

        let metadata: FileMetadata = response.json().await?;
        let stored = metadata
            .path_display
            .or(metadata.path_lower)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Dropbox upload returned no path"))?;
        info!(path = %stored, "step: dropbox upload done");
        Ok(stored)
    }

    /// Creates a public shared link for `path`. An existing link for the same path is reused.
    #[instrument(skip(self))]
    pub async fn create_shared_link(&self, path: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .post(format!(
                "{}/2/sharing/create_shared_link_with_settings",
                self.api_base
            ))
            .bearer_auth(&self.access_token)
            .json(&PathArg { path })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            if let Some(url) = existing_link_url(&body) {
                info!(path = %path, "step: dropbox shared link already exists, reusing");
                return Ok(url);
            }
            if is_link_already_exists(&body) {
                return self.find_shared_link(path).await;
            }
            anyhow::bail!("Dropbox shared link error ({}): {}", status, body);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Dropbox shared link error ({}): {}", status, error_text);
        }

        let link: SharedLinkMetadata = response.json().await?;
        if link.url.is_empty() {
            anyhow::bail!("Dropbox shared link response has no url");
        }
        Ok(link.url)
    }

    /// Looks up an already created shared link for `path`.
    async fn find_shared_link(&self, path: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .post(format!("{}/2/sharing/list_shared_links", self.api_base))
            .bearer_auth(&self.access_token)
            .json(&ListSharedLinksArg {
                path,
                direct_only: true,
            })
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Dropbox list shared links error ({}): {}", status, error_text);
        }
        let result: ListSharedLinksResult = response.json().await?;
        result
            .links
            .into_iter()
            .next()
            .map(|l| l.url)
            .ok_or_else(|| anyhow::anyhow!("Dropbox has no shared link for {}", path))
    }

    /// Uploads and shares in one go; returns the direct (raw) link.
    pub async fn upload_and_share(&self, path: &str, contents: Bytes) -> anyhow::Result<String> {
        let stored = self.upload(path, contents).await?;
        let shared = self.create_shared_link(&stored).await?;
        Ok(direct_link(&shared))
    }
}

fn existing_link_url(body: &Value) -> Option<String> {
    body.pointer("/error/shared_link_already_exists/metadata/url")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn is_link_already_exists(body: &Value) -> bool {
    body.pointer("/error/.tag").and_then(Value::as_str) == Some("shared_link_already_exists")
}

/// Rewrites a Dropbox shared link so it serves the file itself instead of the preview page.
///
/// `dl=0` / `dl=1` are replaced by `raw=1`; other query parameters (e.g. `rlkey`) are kept.
/// Unparseable input is returned with the legacy `?dl=0` suffix swap applied.
pub fn direct_link(shared_url: &str) -> String {
    let Ok(mut url) = Url::parse(shared_url) else {
        warn!(url = %shared_url, "Shared link is not a valid URL, using textual rewrite");
        return shared_url.replace("?dl=0", "?raw=1");
    };
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "dl" && k != "raw")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("raw", "1");
    url.to_string()
}
