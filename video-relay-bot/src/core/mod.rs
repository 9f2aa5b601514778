//! Core types and traits: Bot, Message, pipeline outcome, error, logger.
//! Transport-agnostic.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use error::{BotError, ConfigError, Result};
pub use logger::init_tracing;
pub use types::{
    Attachment, Chat, GenerationResult, InboundVideoRef, Message, ProcessedVideo,
    ProcessingOutcome, ProcessingStatus, ToCoreMessage, User,
};
