//! Component factory: builds the shared clients, pipeline and dispatcher from config.

use std::sync::Arc;

use dropbox_client::{DropboxClient, DROPBOX_API_BASE, DROPBOX_CONTENT_BASE};
use image_generation_client::ImageGenerationClient;
use openai_client::{mask_token, OpenAIClient};
use reqwest::Url;
use tracing::{info, instrument};

use crate::config::BotConfig;
use crate::core::Bot as CoreBot;
use crate::dispatcher::VideoDispatcher;
use crate::pipeline::VideoPipeline;
use crate::services::{ContentGenerator, DropboxStorage, OpenAIGenerator, VideoStorage};
use crate::telegram::TelegramBotAdapter;

/// Long-lived handles created once at startup and shared by every message.
#[derive(Clone)]
pub struct BotComponents {
    pub telegram: TelegramBotAdapter,
    pub dispatcher: Arc<VideoDispatcher>,
}

/// Builds the teloxide bot, honoring TELEGRAM_API_URL.
pub fn build_teloxide_bot(config: &BotConfig) -> anyhow::Result<teloxide::Bot> {
    let bot = teloxide::Bot::new(&config.bot_token);
    Ok(match &config.telegram_api_url {
        Some(url) => bot.set_api_url(Url::parse(url)?),
        None => bot,
    })
}

/// Builds all components. No network calls are made here.
#[instrument(skip(config))]
pub fn build_bot_components(config: &BotConfig) -> anyhow::Result<BotComponents> {
    let http = reqwest::Client::new();
    let telegram = TelegramBotAdapter::new(build_teloxide_bot(config)?);

    let dropbox = DropboxClient::with_base_urls(
        config.dropbox_access_token.clone(),
        config
            .dropbox_api_url
            .clone()
            .unwrap_or_else(|| DROPBOX_API_BASE.to_string()),
        config
            .dropbox_content_url
            .clone()
            .unwrap_or_else(|| DROPBOX_CONTENT_BASE.to_string()),
    );
    let storage: Arc<dyn VideoStorage> =
        Arc::new(DropboxStorage::new(dropbox, http.clone(), &config.upload_dir));

    let (captions, images) = match &config.openai_base_url {
        Some(base) => (
            OpenAIClient::with_base_url(config.openai_api_key.clone(), base.clone()),
            ImageGenerationClient::with_base_url(config.openai_api_key.clone(), base.clone()),
        ),
        None => (
            OpenAIClient::new(config.openai_api_key.clone()),
            ImageGenerationClient::new(config.openai_api_key.clone()),
        ),
    };
    let generator: Arc<dyn ContentGenerator> = Arc::new(OpenAIGenerator::new(
        captions.with_model(&config.caption_model),
        images.with_model(&config.image_model),
    ));

    let bot: Arc<dyn CoreBot> = Arc::new(telegram.clone());
    let pipeline = Arc::new(VideoPipeline::new(bot.clone(), storage, generator, http));
    let dispatcher = Arc::new(VideoDispatcher::new(
        bot,
        pipeline,
        config.max_concurrent_pipelines,
    ));

    info!(
        bot_token = %mask_token(&config.bot_token),
        openai_api_key = %mask_token(&config.openai_api_key),
        caption_model = %config.caption_model,
        image_model = %config.image_model,
        upload_dir = %config.upload_dir,
        max_concurrent_pipelines = config.max_concurrent_pipelines,
        "Components built"
    );

    Ok(BotComponents {
        telegram,
        dispatcher,
    })
}
