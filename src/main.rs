//! Parley - two nodes taking turns reading a scripted conversation aloud
//!
//! Each node announces itself on an MQTT topic until its partner answers,
//! then the pair pass a line index back and forth, speaking one line per
//! turn and looping the script forever.

mod bus;
mod config;
mod runtime;
mod script;
mod speech;
mod state_machine;
mod wire;

use bus::MqttBus;
use clap::Parser;
use config::{Cli, NodeConfig};
use runtime::ProductionRuntime;
use script::Conversation;
use speech::{LoggingSpeaker, SpeechBackend, Speaker};
use state_machine::NodeContext;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = NodeConfig::try_from(Cli::parse())?;

    // Initialize logging
    let log_json = config.log_json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley=info".into()),
        )
        .with(log_json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
        }))
        .with((!log_json).then(tracing_subscriber::fmt::layer))
        .init();

    // The script must be usable before we show up on the bus
    tracing::info!(path = %config.script_path.display(), "Loading conversation");
    let conversation = Arc::new(Conversation::load(&config.script_path)?);
    tracing::info!(turns = conversation.len(), "Conversation loaded");
    for warning in conversation.lint(config.identity.me(), config.identity.peer()) {
        tracing::warn!("{warning}");
    }

    let speaker = LoggingSpeaker::new(SpeechBackend::detect(&config));
    tracing::info!(backend = %speaker.name(), voice = %config.voice, "Speech ready");

    let (bus, events) = MqttBus::connect(&config).await?;

    let context = NodeContext::from_config(&config, conversation);
    let runtime = ProductionRuntime::new(context, bus, speaker, events, config.hello_interval);

    tokio::select! {
        result = runtime.run() => {
            if let Err(e) = &result {
                tracing::error!(error = %e, "Node stopped");
            }
            result?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("Interrupted, shutting down");
        }
    }

    Ok(())
}
