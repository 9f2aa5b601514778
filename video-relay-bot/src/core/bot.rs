//! Bot abstraction for replying to chats and resolving attached files.
//!
//! [`Bot`] is transport-agnostic; [`crate::telegram::TelegramBotAdapter`] implements it via teloxide.

use async_trait::async_trait;

use super::error::Result;
use super::types::{Chat, Message};

/// Chat-provider operations used by the dispatcher and the pipeline.
///
/// One instance is created at startup and shared by every in-flight message.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;

    /// Resolves a provider file id to a URL the file can be downloaded from.
    ///
    /// Fails with [`super::BotError::DownloadResolution`] when the provider reports no path.
    async fn resolve_file_url(&self, file_id: &str) -> Result<String>;

    /// Sends a reply into the message's chat.
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }
}
