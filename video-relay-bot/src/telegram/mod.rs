//! Telegram layer: message adapters, Bot implementation, long-poll and webhook transports.

mod adapters;
mod bot_adapter;
mod runner;
mod webhook;

pub use adapters::TelegramMessageWrapper;
pub use bot_adapter::{file_download_url, TelegramBotAdapter};
pub use runner::run_polling;
pub use webhook::{run_webhook, webhook_endpoint, webhook_router, LIVENESS_TEXT};
