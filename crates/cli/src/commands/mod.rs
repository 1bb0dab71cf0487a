//! Subcommand implementations and the wiring they share.

pub mod ask;
pub mod chat;
pub mod health;
pub mod history;
pub mod models;
pub mod services;
pub mod status;

use std::sync::Arc;

use switchboard_config::AppConfig;
use switchboard_memory::ConversationStore;
use switchboard_providers::{Dispatcher, ServiceRegistry};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    AppConfig::load().map_err(|e| format!("Failed to load config: {e}").into())
}

/// Build the registry once and hand it to a dispatcher.
fn dispatcher(config: &AppConfig) -> Result<Dispatcher, Box<dyn std::error::Error>> {
    let registry = ServiceRegistry::from_config(config)?;
    Ok(Dispatcher::new(Arc::new(registry)))
}

/// The history store, unless history is disabled.
fn open_history(config: &AppConfig) -> Option<ConversationStore> {
    config
        .history
        .enabled
        .then(|| ConversationStore::open(config.history_dir()))
}
