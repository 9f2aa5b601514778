//! # Video processing pipeline
//!
//! One run per inbound video: resolve the file, download it, upload it to storage, then generate
//! caption and thumbnail concurrently and compose the reply. Steps before generation are
//! sequential; any failure ends the run without retry.

mod compose;

pub use compose::compose_reply;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::core::{
    Bot, BotError, GenerationResult, InboundVideoRef, ProcessedVideo, ProcessingOutcome, Result,
};
use crate::services::{
    fetch_bytes, ContentGenerator, UploadSource, VideoStorage, DEFAULT_CAPTION_PROMPT,
    DEFAULT_THUMBNAIL_PROMPT,
};

static VIDEO_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Object name for the next upload. Unique within this process.
pub fn next_video_name() -> String {
    let seq = VIDEO_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!(
        "video_{}_{}.mp4",
        chrono::Utc::now().timestamp_millis(),
        seq
    )
}

/// Pipeline dependencies. Shared by all concurrent runs; holds no per-run state.
pub struct VideoPipeline {
    bot: Arc<dyn Bot>,
    storage: Arc<dyn VideoStorage>,
    generator: Arc<dyn ContentGenerator>,
    http: reqwest::Client,
}

impl VideoPipeline {
    pub fn new(
        bot: Arc<dyn Bot>,
        storage: Arc<dyn VideoStorage>,
        generator: Arc<dyn ContentGenerator>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            bot,
            storage,
            generator,
            http,
        }
    }

    /// Runs the pipeline; errors become [`ProcessingOutcome::Failed`].
    #[instrument(skip(self, video), fields(chat_id = video.chat_id))]
    pub async fn process(&self, video: &InboundVideoRef) -> ProcessingOutcome {
        match self.run(video).await {
            Ok(processed) => {
                info!(chat_id = video.chat_id, video_url = %processed.video_url, "step: pipeline completed");
                ProcessingOutcome::Completed(processed)
            }
            Err(e) => {
                error!(chat_id = video.chat_id, error = %e, "step: pipeline failed");
                ProcessingOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn run(&self, video: &InboundVideoRef) -> Result<ProcessedVideo> {
        info!(chat_id = video.chat_id, file_id = %video.file_id, "step: resolving file");
        let file_url = self.bot.resolve_file_url(&video.file_id).await?;

        info!(chat_id = video.chat_id, "step: downloading video");
        let bytes = fetch_bytes(&self.http, &file_url)
            .await
            .map_err(|e| BotError::Download(e.to_string()))?;
        info!(chat_id = video.chat_id, size = bytes.len(), "step: video downloaded");

        let name = next_video_name();
        let video_url = self.storage.upload(UploadSource::Bytes(bytes), &name).await?;

        let (caption_prompt, thumbnail_prompt) = if video.prompt.is_empty() {
            (DEFAULT_CAPTION_PROMPT, DEFAULT_THUMBNAIL_PROMPT)
        } else {
            (video.prompt.as_str(), video.prompt.as_str())
        };

        info!(chat_id = video.chat_id, "step: generating caption and thumbnail");
        let (caption, thumbnail) = tokio::join!(
            self.generator.generate_caption(caption_prompt),
            self.generator.generate_thumbnail(thumbnail_prompt),
        );
        let caption = caption?;
        let generation = GenerationResult {
            caption: caption.caption,
            hashtags: caption.hashtags,
            keywords: caption.keywords,
            thumbnail_url: thumbnail?,
        };

        let message = compose_reply(&video_url, &generation);
        Ok(ProcessedVideo {
            video_url,
            generation,
            message,
        })
    }
}
