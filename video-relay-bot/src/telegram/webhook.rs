//! Webhook transport: a small axum server Telegram posts updates to.
//!
//! `GET /` answers a liveness string. `POST /webhook/{secret}` accepts an update when `secret`
//! equals the bot token and always answers 200 right away; the message is handled in a
//! background task so Telegram never waits on a pipeline run.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use teloxide::types::{Update, UpdateKind};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::ToCoreMessage;
use crate::dispatcher::VideoDispatcher;

use super::adapters::TelegramMessageWrapper;
use super::bot_adapter::TelegramBotAdapter;

pub const LIVENESS_TEXT: &str = "✅ Telegram Video Processor is Running!";

#[derive(Clone)]
struct WebhookState {
    dispatcher: Arc<VideoDispatcher>,
    secret: Arc<str>,
}

/// Public URL Telegram should post to.
pub fn webhook_endpoint(public_url: &str, secret: &str) -> String {
    format!("{}/webhook/{}", public_url.trim_end_matches('/'), secret)
}

/// Builds the router. `secret` is the path suffix that authenticates Telegram (the bot token).
pub fn webhook_router(dispatcher: Arc<VideoDispatcher>, secret: &str) -> Router {
    let state = WebhookState {
        dispatcher,
        secret: Arc::from(secret),
    };
    Router::new()
        .route("/", get(liveness))
        .route("/webhook/{secret}", post(receive_update))
        .with_state(state)
}

async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

async fn receive_update(
    State(state): State<WebhookState>,
    Path(secret): Path<String>,
    body: Bytes,
) -> StatusCode {
    if secret.as_str() != &*state.secret {
        warn!("Webhook called with wrong secret");
        return StatusCode::NOT_FOUND;
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, body_len = body.len(), "Unparseable webhook update");
            return StatusCode::OK;
        }
    };

    match update.kind {
        UpdateKind::Message(msg) => {
            let core_msg = TelegramMessageWrapper(&msg).to_core();
            let dispatcher = state.dispatcher.clone();
            tokio::spawn(async move {
                dispatcher.handle(&core_msg).await;
            });
        }
        _ => debug!(update_id = update.id.0, "Ignoring non-message update"),
    }
    StatusCode::OK
}

/// Binds the listener, registers the webhook with Telegram, and serves until Ctrl-C.
///
/// Registration happens only after the port is bound.
pub async fn run_webhook(
    adapter: &TelegramBotAdapter,
    dispatcher: Arc<VideoDispatcher>,
    public_url: &str,
    port: u16,
) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Webhook server listening");

    let token = adapter.inner().token().to_string();
    adapter
        .register_webhook(&webhook_endpoint(public_url, &token))
        .await?;
    info!(
        endpoint = %webhook_endpoint(public_url, &openai_client::mask_token(&token)),
        "Webhook registered"
    );

    let app = webhook_router(dispatcher, &token);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down webhook server");
        })
        .await?;
    Ok(())
}
