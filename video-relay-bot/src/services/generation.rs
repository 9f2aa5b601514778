//! Caption and thumbnail generation. The two calls are independent and share no state.

use async_trait::async_trait;
use image_generation_client::ImageGenerationClient;
use openai_client::{CaptionData, OpenAIClient};
use tracing::{error, instrument};

use crate::core::{BotError, Result};

/// Thumbnail value when the provider answered without an image URL.
pub const NO_THUMBNAIL: &str = "No thumbnail generated.";
/// Prompts used when the user sent the video without a caption.
pub const DEFAULT_CAPTION_PROMPT: &str = "Create a general caption for this video";
pub const DEFAULT_THUMBNAIL_PROMPT: &str = "Create a thumbnail for this video";

/// Generative AI provider for captions and thumbnails.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Caption with hashtags/keywords; incomplete provider answers yield empty sequences.
    async fn generate_caption(&self, prompt: &str) -> Result<CaptionData>;

    /// Thumbnail image URL, or [`NO_THUMBNAIL`] when the provider returned none.
    async fn generate_thumbnail(&self, prompt: &str) -> Result<String>;
}

/// OpenAI-backed [`ContentGenerator`].
pub struct OpenAIGenerator {
    captions: OpenAIClient,
    images: ImageGenerationClient,
}

impl OpenAIGenerator {
    pub fn new(captions: OpenAIClient, images: ImageGenerationClient) -> Self {
        Self { captions, images }
    }
}

#[async_trait]
impl ContentGenerator for OpenAIGenerator {
    #[instrument(skip(self))]
    async fn generate_caption(&self, prompt: &str) -> Result<CaptionData> {
        self.captions.generate_caption(prompt).await.map_err(|e| {
            error!(error = %e, "Caption generation failed");
            BotError::Generation(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn generate_thumbnail(&self, prompt: &str) -> Result<String> {
        let url = self.images.generate_image(prompt).await.map_err(|e| {
            error!(error = %e, "Thumbnail generation failed");
            BotError::Generation(e.to_string())
        })?;
        Ok(url.unwrap_or_else(|| NO_THUMBNAIL.to_string()))
    }
}
