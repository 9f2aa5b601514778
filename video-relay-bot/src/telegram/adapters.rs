//! Adapters from Telegram (teloxide) types to core types.

use crate::core::{Attachment, Chat, Message, ToCoreMessage, User};

/// Wraps a teloxide Message for conversion to core [`Message`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        let msg = self.0;
        Message {
            id: msg.id.to_string(),
            user: msg
                .from
                .as_ref()
                .map(|u| User {
                    id: u.id.0 as i64,
                    username: u.username.clone(),
                })
                .unwrap_or(User {
                    id: 0,
                    username: None,
                }),
            chat: Chat {
                id: msg.chat.id.0,
                chat_type: self.chat_type().to_string(),
            },
            content: msg.caption().or_else(|| msg.text()).unwrap_or("").to_string(),
            attachment: self.attachment(),
            created_at: chrono::Utc::now(),
        }
    }
}

impl<'a> TelegramMessageWrapper<'a> {
    fn chat_type(&self) -> &'static str {
        let chat = &self.0.chat;
        if chat.is_private() {
            "private"
        } else if chat.is_channel() {
            "channel"
        } else {
            "group"
        }
    }

    /// Native video first, then a document of any media type.
    fn attachment(&self) -> Option<Attachment> {
        if let Some(video) = self.0.video() {
            return Some(Attachment::Video {
                file_id: video.file.id.0.clone(),
                mime_type: video.mime_type.as_ref().map(|m| m.essence_str().to_string()),
            });
        }
        self.0.document().map(|doc| Attachment::Document {
            file_id: doc.file.id.0.clone(),
            mime_type: doc.mime_type.as_ref().map(|m| m.essence_str().to_string()),
            file_name: doc.file_name.clone(),
        })
    }
}
