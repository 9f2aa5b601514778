//! Inbound message model and the video reference extracted from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chat::{Chat, User};

/// File attached to a message. Only kinds that can carry a video are modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attachment {
    /// Native video.
    Video {
        file_id: String,
        mime_type: Option<String>,
    },
    /// Generic document; counts as video only when its media type starts with `video/`.
    Document {
        file_id: String,
        mime_type: Option<String>,
        file_name: Option<String>,
    },
}

impl Attachment {
    /// File id if this attachment is video-like.
    pub fn video_file_id(&self) -> Option<&str> {
        match self {
            Attachment::Video { file_id, .. } => Some(file_id.as_str()),
            Attachment::Document {
                file_id,
                mime_type: Some(mime),
                ..
            } if mime.to_ascii_lowercase().starts_with("video/") => Some(file_id.as_str()),
            Attachment::Document { .. } => None,
        }
    }
}

/// A single inbound message, transport-agnostic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    /// Text body or media caption.
    pub content: String,
    pub attachment: Option<Attachment>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Video reference for the pipeline, or `None` when the message carries no video.
    pub fn video_ref(&self) -> Option<InboundVideoRef> {
        let file_id = self.attachment.as_ref()?.video_file_id()?;
        Some(InboundVideoRef {
            file_id: file_id.to_string(),
            chat_id: self.chat.id,
            prompt: self.content.trim().to_string(),
        })
    }
}

/// What the pipeline needs to process one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundVideoRef {
    /// Opaque handle issued by the chat provider.
    pub file_id: String,
    pub chat_id: i64,
    /// Caption text; empty when the user sent none.
    pub prompt: String,
}
