//! Main entry: validate config, init logging, build components, then run the selected transport.

use tracing::{info, instrument};

use crate::components::build_bot_components;
use crate::config::{BotConfig, Transport};
use crate::core::init_tracing;
use crate::telegram::{run_polling, run_webhook};

/// Runs the bot until the transport stops. `force_polling` ignores WEBHOOK_URL.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig, force_polling: bool) -> anyhow::Result<()> {
    config.validate()?;
    init_tracing(&config.log_file)?;

    let transport = if force_polling {
        Transport::Polling
    } else {
        config.transport()
    };
    info!(transport = transport_name(&transport), "Initializing bot");

    let components = build_bot_components(&config)?;
    info!("Bot started successfully");

    match transport {
        Transport::Polling => {
            run_polling(components.telegram.inner().clone(), components.dispatcher).await
        }
        Transport::Webhook { public_url, port } => {
            run_webhook(&components.telegram, components.dispatcher, &public_url, port).await
        }
    }
}

fn transport_name(transport: &Transport) -> &'static str {
    match transport {
        Transport::Polling => "polling",
        Transport::Webhook { .. } => "webhook",
    }
}
