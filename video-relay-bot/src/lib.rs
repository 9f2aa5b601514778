//! # Video relay bot
//!
//! Telegram bot that takes a video, stores it on Dropbox, asks OpenAI for a caption and a
//! thumbnail, and replies with the links. Loads config from env and runs either long polling
//! or a webhook server.

pub mod cli;
pub mod components;
pub mod config;
pub mod core;
pub mod dispatcher;
pub mod pipeline;
pub mod runner;
pub mod services;
pub mod telegram;

pub use cli::{load_config, Cli, Commands};

pub use crate::core::{
    init_tracing, Attachment, Bot, BotError, Chat, ConfigError, GenerationResult,
    InboundVideoRef, Message, ProcessedVideo, ProcessingOutcome, ProcessingStatus, Result,
    ToCoreMessage, User,
};

pub use components::{build_bot_components, BotComponents};
pub use config::{BotConfig, Transport};
pub use dispatcher::{Disposition, VideoDispatcher, MSG_FAILED, MSG_PROCESSING, MSG_SEND_VIDEO};
pub use pipeline::{compose_reply, VideoPipeline};
pub use runner::run_bot;
pub use services::{
    ContentGenerator, DropboxStorage, OpenAIGenerator, UploadSource, VideoStorage, NO_THUMBNAIL,
};
pub use telegram::{TelegramBotAdapter, TelegramMessageWrapper};

pub use openai_client::CaptionData;
