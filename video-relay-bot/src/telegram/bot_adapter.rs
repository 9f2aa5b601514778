//! Wraps teloxide::Bot and implements [`crate::core::Bot`]. Production code talks to Telegram;
//! tests substitute another Bot impl.

use async_trait::async_trait;
use reqwest::Url;
use teloxide::{prelude::*, types::ChatId, types::FileId};
use tracing::{info, instrument};

use crate::core::{Bot as CoreBot, BotError, Chat, Result};

/// Thin wrapper around teloxide::Bot that implements core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }

    /// Registers `url` as the webhook Telegram posts updates to.
    pub async fn register_webhook(&self, url: &str) -> anyhow::Result<()> {
        let url = Url::parse(url)?;
        self.bot.set_webhook(url).await?;
        Ok(())
    }
}

/// `<api>/file/bot<token>/<path>`, the Bot API download location for a resolved file.
pub fn file_download_url(api_url: &str, token: &str, file_path: &str) -> String {
    format!(
        "{}/file/bot{}/{}",
        api_url.trim_end_matches('/'),
        token,
        file_path.trim_start_matches('/')
    )
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(|e| BotError::Bot(e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn resolve_file_url(&self, file_id: &str) -> Result<String> {
        let file = self
            .bot
            .get_file(FileId(file_id.to_string()))
            .await
            .map_err(|e| BotError::DownloadResolution(e.to_string()))?;
        if file.path.is_empty() {
            return Err(BotError::DownloadResolution(format!(
                "no file path for {}",
                file_id
            )));
        }
        info!(file_path = %file.path, size = file.meta.size, "File resolved");
        Ok(file_download_url(
            self.bot.api_url().as_str(),
            self.bot.token(),
            &file.path,
        ))
    }
}
