//! Bot configuration: service secrets, transport selection, tuning. Loaded from env.

mod bot_config;


pub use bot_config::{
    BotConfig, Transport, DEFAULT_LOG_FILE, DEFAULT_MAX_CONCURRENT_PIPELINES, DEFAULT_PORT,
    DEFAULT_UPLOAD_DIR,
};
