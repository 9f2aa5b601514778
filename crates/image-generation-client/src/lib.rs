//! OpenAI image generation client used for video thumbnails.
//!
//! Calls the images endpoint and hands back the first image URL, if the provider returned one.

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::{CreateImageRequestArgs, Image, ImageModel, ImageSize},
    Client,
};
use std::sync::Arc;
use tracing;

/// Default image model for thumbnails.
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

/// OpenAI image generation client.
#[derive(Clone)]
pub struct ImageGenerationClient {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    api_key_for_logging: String,
}

impl ImageGenerationClient {
    pub fn new(api_key: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key.clone());
        Self::from_parts(Client::with_config(config), api_key)
    }

    /// Client against a custom base URL (compatible services, test servers).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key.clone())
            .with_api_base(base_url);
        Self::from_parts(Client::with_config(config), api_key)
    }

    fn from_parts(client: Client<OpenAIConfig>, api_key_for_logging: String) -> Self {
        Self {
            client: Arc::new(client),
            model: DEFAULT_IMAGE_MODEL.to_string(),
            api_key_for_logging,
        }
    }

    /// Sets the model (`dall-e-2` or `dall-e-3`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generates one image for `prompt`.
    ///
    /// Returns `Ok(None)` when the response carries no URL (e.g. base64-only data).
    #[tracing::instrument(skip(self))]
    pub async fn generate_image(&self, prompt: &str) -> Result<Option<String>> {
        let masked = openai_client::mask_token(&self.api_key_for_logging);

        tracing::info!(
            model = %self.model,
            prompt_preview = %prompt.chars().take(100).collect::<String>(),
            api_key = %masked,
            "OpenAI image generation request"
        );

        let request = CreateImageRequestArgs::default()
            .prompt(prompt)
            .model(ImageModel::Other(self.model.clone()))
            .size(ImageSize::S1024x1024)
            .n(1)
            .build()?;

        let response = self.client.images().create(request).await?;

        let url = response.data.iter().find_map(|image| match image.as_ref() {
            Image::Url { url, .. } => Some(url.clone()),
            _ => None,
        });

        match &url {
            Some(url) => tracing::info!(image_url = %url, "OpenAI image generation completed"),
            None => tracing::warn!("OpenAI image generation returned no image URL"),
        }
        Ok(url)
    }
}
