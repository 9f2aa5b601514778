//! Error types for the bot core.
//!
//! [`BotError`] covers failures while handling a message; every variant is recoverable and ends
//! in a chat reply. [`ConfigError`] is fatal and stops the process before it connects anywhere.

use thiserror::Error;

/// Runtime failure while handling one inbound message.
#[derive(Error, Debug)]
pub enum BotError {
    /// The chat provider could not turn a file id into a downloadable path.
    #[error("File resolution error: {0}")]
    DownloadResolution(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Generation error: {0}")]
    Generation(String),

    /// Sending to the chat provider failed.
    #[error("Bot error: {0}")]
    Bot(String),

    /// Anything that escaped the pipeline itself (panic, cancelled task).
    #[error("Dispatch error: {0}")]
    Dispatch(String),
}

/// Result type for core operations; uses [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;

/// Startup configuration error.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", describe_missing(.0))]
    Missing(Vec<&'static str>),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

fn describe_missing(keys: &[&'static str]) -> String {
    keys.iter()
        .map(|key| match key_hint(key) {
            Some(hint) => format!("{} ({})", key, hint),
            None => key.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn key_hint(key: &str) -> Option<&'static str> {
    match key {
        "TELEGRAM_BOT_TOKEN" => Some("get one from @BotFather on Telegram"),
        "DROPBOX_ACCESS_TOKEN" => Some("create one at https://www.dropbox.com/developers"),
        "OPENAI_API_KEY" => Some("get one from https://platform.openai.com/api-keys"),
        _ => None,
    }
}
