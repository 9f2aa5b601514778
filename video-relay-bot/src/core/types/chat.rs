//! Chat and user identity types for core messages.

use serde::{Deserialize, Serialize};

/// Chat (channel or private) identity; replies go to `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

/// Sender identity, used for logging only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}
