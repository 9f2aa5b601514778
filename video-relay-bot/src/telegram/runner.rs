//! Long-poll runner: converts teloxide messages to core::Message and hands them to the dispatcher.

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{info, instrument};

use crate::core::ToCoreMessage;
use crate::dispatcher::VideoDispatcher;

use super::adapters::TelegramMessageWrapper;

/// Starts the REPL. Each message is handled in its own task so polling never waits on a run.
#[instrument(skip(bot, dispatcher))]
pub async fn run_polling(bot: teloxide::Bot, dispatcher: Arc<VideoDispatcher>) -> anyhow::Result<()> {
    // A leftover webhook makes getUpdates fail.
    bot.delete_webhook().await?;

    if let Ok(me) = bot.get_me().await {
        if let Some(username) = &me.user.username {
            info!(username = %username, "Bot identity confirmed");
        }
    }

    info!("Starting long polling");
    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let dispatcher = dispatcher.clone();
        async move {
            let core_msg = TelegramMessageWrapper(&msg).to_core();
            tokio::spawn(async move {
                dispatcher.handle(&core_msg).await;
            });
            Ok(())
        }
    })
    .await;

    Ok(())
}
