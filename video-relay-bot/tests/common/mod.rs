//! Shared mocks for dispatcher/pipeline integration tests.
//!
//! MockBot records every outgoing message per chat and resolves file ids to URLs on a mockito
//! server. MockStorage and MockGenerator count calls and derive their results from their inputs,
//! so concurrent runs can be checked for cross-talk.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use video_relay_bot::{
    Attachment, Bot, BotError, CaptionData, Chat, ContentGenerator, Message, Result,
    UploadSource, User, VideoDispatcher, VideoPipeline, VideoStorage,
};

/// One recorded `send_message` call.
#[derive(Debug, Clone)]
pub struct SentRecord {
    pub chat_id: i64,
    pub text: String,
}

#[derive(Default)]
pub struct MockBot {
    sent: Mutex<Vec<SentRecord>>,
    /// file_id -> download URL; unknown ids fail resolution.
    files: Mutex<HashMap<String, String>>,
    /// Sends whose text contains this marker fail and are not recorded.
    failing_marker: Mutex<Option<String>>,
    pub resolve_calls: AtomicUsize,
}

impl MockBot {
    pub fn add_file(&self, file_id: &str, url: String) {
        self.files.lock().unwrap().insert(file_id.to_string(), url);
    }

    /// Makes every later send whose text contains `marker` fail.
    pub fn fail_sends_containing(&self, marker: &str) {
        *self.failing_marker.lock().unwrap() = Some(marker.to_string());
    }

    pub fn sent(&self) -> Vec<SentRecord> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat_id: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|r| r.chat_id == chat_id)
            .map(|r| r.text)
            .collect()
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        if let Some(marker) = self.failing_marker.lock().unwrap().as_deref() {
            if text.contains(marker) {
                return Err(BotError::Bot("message is too long".to_string()));
            }
        }
        self.sent.lock().unwrap().push(SentRecord {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn resolve_file_url(&self, file_id: &str) -> Result<String> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.files
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| BotError::DownloadResolution(format!("no file path for {}", file_id)))
    }
}

/// Storage that returns `https://storage.example.com/<name>?raw=1`.
#[derive(Default)]
pub struct MockStorage {
    pub fail: bool,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    /// (name, bytes) per upload.
    uploads: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MockStorage {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn uploads(&self) -> Vec<(String, Vec<u8>)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoStorage for MockStorage {
    async fn upload(&self, content: UploadSource, name: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail {
            return Err(BotError::Upload("storage unavailable".to_string()));
        }
        let bytes = match content {
            UploadSource::Bytes(bytes) => bytes.to_vec(),
            UploadSource::Url(url) => url.into_bytes(),
        };
        self.uploads.lock().unwrap().push((name.to_string(), bytes));
        Ok(format!("https://storage.example.com/{}?raw=1", name))
    }
}

/// Generator whose outputs echo the prompt.
#[derive(Default)]
pub struct MockGenerator {
    pub caption_calls: AtomicUsize,
    pub thumbnail_calls: AtomicUsize,
    /// Highest number of generation calls running at the same time.
    pub max_in_flight: AtomicUsize,
    in_flight: AtomicUsize,
    fail_caption: bool,
    /// When set, the caption comes from parsing this raw provider answer.
    raw_caption: Option<String>,
    /// Prompt that makes the caption call panic.
    panic_on: Option<String>,
    /// Fixed duration of every call; otherwise a short per-prompt delay.
    delay: Option<Duration>,
    /// Prompts seen by either call, in call order.
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn failing_caption() -> Self {
        Self {
            fail_caption: true,
            ..Default::default()
        }
    }

    pub fn panicking_on(prompt: &str) -> Self {
        Self {
            panic_on: Some(prompt.to_string()),
            ..Default::default()
        }
    }

    pub fn with_raw_caption(raw: &str) -> Self {
        Self {
            raw_caption: Some(raw.to_string()),
            ..Default::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.caption_calls.load(Ordering::SeqCst) + self.thumbnail_calls.load(Ordering::SeqCst)
    }

    async fn simulate_work(&self, delay: Duration) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay.unwrap_or(delay)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Distinct per-prompt delay so concurrent runs interleave.
fn delay_for(prompt: &str) -> Duration {
    Duration::from_millis(5 + (prompt.len() as u64 % 4) * 10)
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    async fn generate_caption(&self, prompt: &str) -> Result<CaptionData> {
        self.caption_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.panic_on.as_deref() == Some(prompt) {
            panic!("caption provider blew up");
        }
        self.simulate_work(delay_for(prompt)).await;
        if self.fail_caption {
            return Err(BotError::Generation("model overloaded".to_string()));
        }
        if let Some(raw) = &self.raw_caption {
            return Ok(openai_client::parse_caption_response(raw));
        }
        let tag = prompt.split_whitespace().last().unwrap_or("video");
        Ok(CaptionData {
            caption: format!("All about {}", prompt),
            hashtags: vec![format!("#{}", tag)],
            keywords: vec![tag.to_string()],
        })
    }

    async fn generate_thumbnail(&self, prompt: &str) -> Result<String> {
        self.thumbnail_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.simulate_work(delay_for(prompt) / 2).await;
        Ok(format!(
            "https://img.example.com/{}.png",
            prompt.replace(' ', "-")
        ))
    }
}

/// Mocks wired into a pipeline and dispatcher.
pub struct Harness {
    pub bot: Arc<MockBot>,
    pub storage: Arc<MockStorage>,
    pub generator: Arc<MockGenerator>,
    pub pipeline: Arc<VideoPipeline>,
    pub dispatcher: Arc<VideoDispatcher>,
}

impl Harness {
    pub fn new(storage: MockStorage, generator: MockGenerator, max_concurrent: usize) -> Self {
        let bot = Arc::new(MockBot::default());
        let storage = Arc::new(storage);
        let generator = Arc::new(generator);
        let pipeline = Arc::new(VideoPipeline::new(
            bot.clone(),
            storage.clone(),
            generator.clone(),
            reqwest::Client::new(),
        ));
        let dispatcher = Arc::new(VideoDispatcher::new(
            bot.clone(),
            pipeline.clone(),
            max_concurrent,
        ));
        Self {
            bot,
            storage,
            generator,
            pipeline,
            dispatcher,
        }
    }

    pub fn default_mocks() -> Self {
        Self::new(MockStorage::default(), MockGenerator::default(), 4)
    }

    /// Serves `body` at `/files/<file_id>` on `server` and makes it resolvable.
    pub async fn serve_file(
        &self,
        server: &mut mockito::ServerGuard,
        file_id: &str,
        body: &[u8],
    ) -> mockito::Mock {
        let path = format!("/files/{}", file_id);
        let mock = server
            .mock("GET", path.as_str())
            .with_status(200)
            .with_header("content-type", "video/mp4")
            .with_body(body)
            .create_async()
            .await;
        self.bot.add_file(file_id, format!("{}{}", server.url(), path));
        mock
    }
}

fn message(chat_id: i64, content: &str, attachment: Option<Attachment>) -> Message {
    Message {
        id: format!("msg_{}", chat_id),
        user: User {
            id: chat_id,
            username: Some("user".to_string()),
        },
        chat: Chat {
            id: chat_id,
            chat_type: "private".to_string(),
        },
        content: content.to_string(),
        attachment,
        created_at: Utc::now(),
    }
}

pub fn video_message(chat_id: i64, file_id: &str, caption: &str) -> Message {
    message(
        chat_id,
        caption,
        Some(Attachment::Video {
            file_id: file_id.to_string(),
            mime_type: Some("video/mp4".to_string()),
        }),
    )
}

pub fn document_message(chat_id: i64, file_id: &str, mime: &str) -> Message {
    message(
        chat_id,
        "",
        Some(Attachment::Document {
            file_id: file_id.to_string(),
            mime_type: Some(mime.to_string()),
            file_name: None,
        }),
    )
}

pub fn text_message(chat_id: i64, text: &str) -> Message {
    message(chat_id, text, None)
}
