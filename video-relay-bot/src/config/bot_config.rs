//! BotConfig: secrets for the three services plus transport and tuning knobs. Loaded from env.

use std::env;

use reqwest::Url;

use crate::core::ConfigError;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPLOAD_DIR: &str = "/videos";
pub const DEFAULT_MAX_CONCURRENT_PIPELINES: usize = 4;
pub const DEFAULT_LOG_FILE: &str = "logs/video-relay-bot.log";

/// How updates reach the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// Long-poll `getUpdates`.
    Polling,
    /// Listen on `port`; Telegram posts to `<public_url>/webhook/<token>`.
    Webhook { public_url: String, port: u16 },
}

/// Full bot config. Use [`BotConfig::load`] for env-based loading, then [`BotConfig::validate`].
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// TELEGRAM_BOT_TOKEN (or BOT_TOKEN)
    pub bot_token: String,
    /// DROPBOX_ACCESS_TOKEN
    pub dropbox_access_token: String,
    /// OPENAI_API_KEY
    pub openai_api_key: String,
    /// WEBHOOK_URL; presence switches to webhook transport
    pub webhook_url: Option<String>,
    /// PORT, only used in webhook mode
    pub port: u16,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// OPENAI_BASE_URL
    pub openai_base_url: Option<String>,
    /// DROPBOX_API_URL
    pub dropbox_api_url: Option<String>,
    /// DROPBOX_CONTENT_URL
    pub dropbox_content_url: Option<String>,
    /// CAPTION_MODEL
    pub caption_model: String,
    /// IMAGE_MODEL
    pub image_model: String,
    /// DROPBOX_UPLOAD_DIR
    pub upload_dir: String,
    /// MAX_CONCURRENT_PIPELINES
    pub max_concurrent_pipelines: usize,
    /// LOG_FILE
    pub log_file: String,
}

impl BotConfig {
    /// Load from environment variables. `token` overrides TELEGRAM_BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self, ConfigError> {
        Self::from_lookup(token, |key| env::var(key).ok())
    }

    /// Load using `lookup` as the variable source. Blank values count as unset.
    ///
    /// All missing required keys are reported together.
    pub fn from_lookup<F>(token: Option<String>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bot_token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| get("TELEGRAM_BOT_TOKEN"))
            .or_else(|| get("BOT_TOKEN"));
        let dropbox_access_token = get("DROPBOX_ACCESS_TOKEN");
        let openai_api_key = get("OPENAI_API_KEY");

        let mut missing = Vec::new();
        if bot_token.is_none() {
            missing.push("TELEGRAM_BOT_TOKEN");
        }
        if dropbox_access_token.is_none() {
            missing.push("DROPBOX_ACCESS_TOKEN");
        }
        if openai_api_key.is_none() {
            missing.push("OPENAI_API_KEY");
        }
        let (Some(bot_token), Some(dropbox_access_token), Some(openai_api_key)) =
            (bot_token, dropbox_access_token, openai_api_key)
        else {
            return Err(ConfigError::Missing(missing));
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                reason: format!("'{}' is not a port number", raw),
            })?,
            None => DEFAULT_PORT,
        };
        let max_concurrent_pipelines = match get("MAX_CONCURRENT_PIPELINES") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "MAX_CONCURRENT_PIPELINES",
                reason: format!("'{}' is not a positive integer", raw),
            })?,
            None => DEFAULT_MAX_CONCURRENT_PIPELINES,
        };

        Ok(Self {
            bot_token,
            dropbox_access_token,
            openai_api_key,
            webhook_url: get("WEBHOOK_URL"),
            port,
            telegram_api_url: get("TELEGRAM_API_URL").or_else(|| get("TELOXIDE_API_URL")),
            openai_base_url: get("OPENAI_BASE_URL"),
            dropbox_api_url: get("DROPBOX_API_URL"),
            dropbox_content_url: get("DROPBOX_CONTENT_URL"),
            caption_model: get("CAPTION_MODEL")
                .unwrap_or_else(|| openai_client::DEFAULT_CAPTION_MODEL.to_string()),
            image_model: get("IMAGE_MODEL")
                .unwrap_or_else(|| image_generation_client::DEFAULT_IMAGE_MODEL.to_string()),
            upload_dir: get("DROPBOX_UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string()),
            max_concurrent_pipelines,
            log_file: get("LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        })
    }

    /// Validate config. Call after load() to fail fast before any network activity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let urls = [
            ("WEBHOOK_URL", &self.webhook_url),
            ("TELEGRAM_API_URL", &self.telegram_api_url),
            ("OPENAI_BASE_URL", &self.openai_base_url),
            ("DROPBOX_API_URL", &self.dropbox_api_url),
            ("DROPBOX_CONTENT_URL", &self.dropbox_content_url),
        ];
        for (key, value) in urls {
            if let Some(url) = value {
                if Url::parse(url).is_err() {
                    return Err(ConfigError::Invalid {
                        key,
                        reason: format!("'{}' is not a valid URL", url),
                    });
                }
            }
        }
        if self.max_concurrent_pipelines == 0 {
            return Err(ConfigError::Invalid {
                key: "MAX_CONCURRENT_PIPELINES",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.upload_dir.starts_with('/') {
            return Err(ConfigError::Invalid {
                key: "DROPBOX_UPLOAD_DIR",
                reason: format!("'{}' must start with '/'", self.upload_dir),
            });
        }
        Ok(())
    }

    pub fn transport(&self) -> Transport {
        match &self.webhook_url {
            Some(url) => Transport::Webhook {
                public_url: url.clone(),
                port: self.port,
            },
            None => Transport::Polling,
        }
    }
}
