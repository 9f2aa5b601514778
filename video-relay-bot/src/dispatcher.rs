//! # Message dispatcher
//!
//! Per inbound message: `Received → Validated → Acknowledged → Processing → Completed | Failed →
//! Replied`. Non-video messages get a prompt and never reach the pipeline. Every video gets an
//! acknowledgment and exactly one final reply, whatever happens inside the pipeline run.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info, instrument, warn};

use crate::core::{Bot, BotError, Message, ProcessingOutcome};
use crate::pipeline::VideoPipeline;

pub const MSG_SEND_VIDEO: &str = "❌ Please send a video file for processing.";
pub const MSG_PROCESSING: &str = "📥 Processing your video...";
pub const MSG_FAILED: &str = "❌ An error occurred while processing your video. Please try again.";

/// How a message was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// No video-like attachment; the user was asked for a video.
    NotAVideo,
    Completed,
    Failed,
}

/// Routes inbound messages into the pipeline and reports results back to the chat.
pub struct VideoDispatcher {
    bot: Arc<dyn Bot>,
    pipeline: Arc<VideoPipeline>,
    permits: Arc<Semaphore>,
}

impl VideoDispatcher {
    /// `max_concurrent` bounds pipeline runs across all chats (minimum 1).
    pub fn new(bot: Arc<dyn Bot>, pipeline: Arc<VideoPipeline>, max_concurrent: usize) -> Self {
        Self {
            bot,
            pipeline,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Handles one message to completion. Never returns an error; failures are replied to the chat.
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, message_id = %message.id))]
    pub async fn handle(&self, message: &Message) -> Disposition {
        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            has_attachment = message.attachment.is_some(),
            "step: message received"
        );

        let Some(video) = message.video_ref() else {
            info!(chat_id = message.chat.id, "step: no video attached");
            self.reply(message, MSG_SEND_VIDEO).await;
            return Disposition::NotAVideo;
        };

        self.reply(message, MSG_PROCESSING).await;

        let outcome = match self.permits.clone().acquire_owned().await {
            Ok(permit) => {
                let pipeline = self.pipeline.clone();
                // Own task so a panic inside the run cannot take the handler down with it.
                let run = tokio::spawn(async move {
                    let _permit = permit;
                    pipeline.process(&video).await
                });
                match run.await {
                    Ok(outcome) => outcome,
                    Err(e) => ProcessingOutcome::Failed {
                        reason: BotError::Dispatch(e.to_string()).to_string(),
                    },
                }
            }
            Err(e) => ProcessingOutcome::Failed {
                reason: BotError::Dispatch(e.to_string()).to_string(),
            },
        };

        match outcome {
            ProcessingOutcome::Completed(processed) => {
                if let Err(e) = self.bot.reply_to(message, &processed.message).await {
                    error!(chat_id = message.chat.id, error = %e, "Failed to send result, sending failure notice");
                    self.reply(message, MSG_FAILED).await;
                    return Disposition::Failed;
                }
                info!(chat_id = message.chat.id, "step: result replied");
                Disposition::Completed
            }
            ProcessingOutcome::Failed { reason } => {
                warn!(chat_id = message.chat.id, reason = %reason, "step: processing failed");
                self.reply(message, MSG_FAILED).await;
                Disposition::Failed
            }
        }
    }

    async fn reply(&self, message: &Message, text: &str) {
        if let Err(e) = self.bot.reply_to(message, text).await {
            error!(chat_id = message.chat.id, error = %e, "Failed to send message");
        }
    }
}
