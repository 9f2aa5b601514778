//! Core types: chat, message, video reference, and pipeline outcome.

mod chat;
mod message;
mod outcome;

pub use chat::{Chat, User};
pub use message::{Attachment, InboundVideoRef, Message};
pub use outcome::{GenerationResult, ProcessedVideo, ProcessingOutcome, ProcessingStatus};

/// Converts a transport-specific message type to core [`Message`].
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> Message;
}
