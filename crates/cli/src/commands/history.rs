//! `switchboard history` — List, show and manage saved conversations.

use clap::Subcommand;
use switchboard_core::message::{Conversation, ConversationId, Role};
use switchboard_memory::ConversationStore;

use super::CommandResult;

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// List conversations, newest first
    List,
    /// Print a conversation (the active one by default)
    Show {
        /// Conversation id
        id: Option<String>,
    },
    /// Make a conversation the active one
    Select {
        /// Conversation id
        id: String,
    },
    /// Delete a conversation
    Delete {
        /// Conversation id
        id: String,
    },
    /// Delete every conversation
    Clear,
    /// Start a new empty conversation
    New,
}

pub async fn run(action: Option<HistoryAction>) -> CommandResult {
    let config = super::load_config()?;
    if !config.history.enabled {
        println!("  History is disabled in config");
        return Ok(());
    }
    let mut store = ConversationStore::open(config.history_dir());

    match action.unwrap_or(HistoryAction::List) {
        HistoryAction::List => list(&store),
        HistoryAction::Show { id } => {
            let conversation = match id {
                Some(id) => store.get(&ConversationId::from(id.as_str())),
                None => store.current(),
            };
            match conversation {
                Some(conversation) => print!("{}", render(conversation)),
                None => println!("  No conversation to show"),
            }
        }
        HistoryAction::Select { id } => {
            store.select(&ConversationId::from(id.as_str()))?;
            println!("  Active conversation: {id}");
        }
        HistoryAction::Delete { id } => {
            store.delete(&ConversationId::from(id.as_str()))?;
            println!("  Deleted conversation {id}");
        }
        HistoryAction::Clear => {
            let count = store.conversations().len();
            store.clear()?;
            println!("  Cleared {count} conversation(s)");
        }
        HistoryAction::New => {
            let id = store.create()?;
            println!("  Started conversation {id}");
        }
    }

    Ok(())
}

fn list(store: &ConversationStore) {
    if store.conversations().is_empty() {
        println!("  No saved conversations");
        return;
    }

    let active = store.current().map(|c| &c.id);
    println!("💬 Conversations ({})", store.dir().display());
    println!("=================");
    for conversation in store.conversations() {
        let marker = if Some(&conversation.id) == active { "*" } else { " " };
        println!(
            "  {marker} {}  {:<33} {:>3} msgs  {}",
            conversation.id,
            conversation.title,
            conversation.messages.len(),
            conversation.updated_at.format("%Y-%m-%d %H:%M"),
        );
    }
}

/// Render a conversation as a plain transcript.
fn render(conversation: &Conversation) -> String {
    let mut out = format!("  {} ({})\n\n", conversation.title, conversation.id);
    for message in &conversation.messages {
        let speaker = match (message.role, message.service) {
            (Role::User, _) => "You".to_string(),
            (Role::Assistant, Some(service)) => service.to_string(),
            (Role::Assistant, None) => "Assistant".to_string(),
        };
        for line in message.content.lines() {
            out.push_str(&format!("  {speaker} > {line}\n"));
        }
        out.push('\n');
    }
    out
}
