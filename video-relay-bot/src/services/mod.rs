//! Outbound service seams used by the pipeline: object storage and content generation.
//! Each trait has one production implementation backed by the matching client crate.

mod generation;
mod storage;

pub use generation::{
    ContentGenerator, OpenAIGenerator, DEFAULT_CAPTION_PROMPT, DEFAULT_THUMBNAIL_PROMPT,
    NO_THUMBNAIL,
};
pub use storage::{DropboxStorage, UploadSource, VideoStorage};

use bytes::Bytes;

/// GETs `url` and returns the body. Non-2xx statuses are errors.
pub(crate) async fn fetch_bytes(http: &reqwest::Client, url: &str) -> anyhow::Result<Bytes> {
    let response = http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("GET returned {}", status);
    }
    Ok(response.bytes().await?)
}
