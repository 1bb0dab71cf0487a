//! File-based conversation history — persistent JSON storage.
//!
//! Two files live in the history directory:
//! - `conversations.json`: the conversation list, newest first
//! - `current_conversation.json`: the id of the active conversation
//!
//! Conversations are loaded on open and flushed to disk on every mutation.
//! The list file only exists while it holds at least one conversation.

use std::path::{Path, PathBuf};

use switchboard_core::error::HistoryError;
use switchboard_core::message::{Conversation, ConversationId, Message};
use switchboard_core::service::ServiceId;
use tracing::{debug, warn};

const CONVERSATIONS_FILE: &str = "conversations.json";
const CURRENT_FILE: &str = "current_conversation.json";

/// A file-backed list of conversations with one optionally active.
pub struct ConversationStore {
    dir: PathBuf,
    conversations: Vec<Conversation>,
    current: Option<ConversationId>,
}

impl ConversationStore {
    /// Open the store in `dir`, loading whatever is already there.
    ///
    /// A corrupt list is logged and replaced by an empty one. The saved
    /// active id is only restored if it names a loaded conversation.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let conversations = Self::load_conversations(&dir.join(CONVERSATIONS_FILE));
        let current = Self::load_current(&dir.join(CURRENT_FILE))
            .filter(|id| conversations.iter().any(|c| &c.id == id));

        debug!(
            dir = %dir.display(),
            count = conversations.len(),
            active = current.is_some(),
            "Conversation history loaded"
        );

        Self {
            dir,
            conversations,
            current,
        }
    }

    fn load_conversations(path: &Path) -> Vec<Conversation> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Vec::new(), // Nothing saved yet
        };

        match serde_json::from_str(&content) {
            Ok(conversations) => conversations,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Error loading conversations");
                Vec::new()
            }
        }
    }

    fn load_current(path: &Path) -> Option<ConversationId> {
        let content = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All conversations, newest first.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn get(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| &c.id == id)
    }

    /// The active conversation, if any.
    pub fn current(&self) -> Option<&Conversation> {
        self.current.as_ref().and_then(|id| self.get(id))
    }

    /// Start a new empty conversation and make it active.
    pub fn create(&mut self) -> Result<ConversationId, HistoryError> {
        let conversation = Conversation::new();
        let id = conversation.id.clone();
        self.conversations.insert(0, conversation);
        self.current = Some(id.clone());
        self.flush()?;
        Ok(id)
    }

    /// Make an existing conversation active.
    pub fn select(&mut self, id: &ConversationId) -> Result<(), HistoryError> {
        if self.get(id).is_none() {
            return Err(HistoryError::NotFound(id.to_string()));
        }
        self.current = Some(id.clone());
        self.flush()
    }

    /// Delete a conversation. If it was active, the first remaining one
    /// (or none) becomes active.
    pub fn delete(&mut self, id: &ConversationId) -> Result<(), HistoryError> {
        let len_before = self.conversations.len();
        self.conversations.retain(|c| &c.id != id);
        if self.conversations.len() == len_before {
            return Err(HistoryError::NotFound(id.to_string()));
        }

        if self.current.as_ref() == Some(id) {
            self.current = self.conversations.first().map(|c| c.id.clone());
        }
        self.flush()
    }

    /// Remove every conversation and both history files.
    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.conversations.clear();
        self.current = None;

        for name in [CONVERSATIONS_FILE, CURRENT_FILE] {
            remove_if_present(&self.dir.join(name))?;
        }
        Ok(())
    }

    /// Append the user's side of a turn to the active conversation,
    /// starting one if none is active.
    pub fn record_user(&mut self, content: &str) -> Result<ConversationId, HistoryError> {
        self.record(Message::user(content))
    }

    /// Append a backend's answer to the active conversation.
    pub fn record_assistant(
        &mut self,
        content: &str,
        service: ServiceId,
    ) -> Result<ConversationId, HistoryError> {
        self.record(Message::assistant(content, service))
    }

    fn record(&mut self, message: Message) -> Result<ConversationId, HistoryError> {
        let id = match self.current.clone() {
            Some(id) if self.get(&id).is_some() => id,
            _ => self.create()?,
        };

        if let Some(conversation) = self.conversations.iter_mut().find(|c| c.id == id) {
            conversation.push(message);
        }
        self.flush()?;
        Ok(id)
    }

    /// Write the list and the active id to disk.
    fn flush(&self) -> Result<(), HistoryError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            HistoryError::Storage(format!("Failed to create history directory: {e}"))
        })?;

        if self.conversations.is_empty() {
            remove_if_present(&self.dir.join(CONVERSATIONS_FILE))?;
        } else {
            let content = serde_json::to_string(&self.conversations).map_err(|e| {
                HistoryError::Storage(format!("Failed to serialize conversations: {e}"))
            })?;
            write(&self.dir.join(CONVERSATIONS_FILE), &content)?;
        }

        match &self.current {
            Some(id) => {
                let content = serde_json::to_string(id).map_err(|e| {
                    HistoryError::Storage(format!("Failed to serialize conversation id: {e}"))
                })?;
                write(&self.dir.join(CURRENT_FILE), &content)?;
            }
            None => remove_if_present(&self.dir.join(CURRENT_FILE))?,
        }

        Ok(())
    }
}

fn write(path: &Path, content: &str) -> Result<(), HistoryError> {
    std::fs::write(path, content).map_err(|e| {
        HistoryError::Storage(format!("Failed to write {}: {e}", path.display()))
    })
}

fn remove_if_present(path: &Path) -> Result<(), HistoryError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(HistoryError::Storage(format!(
            "Failed to remove {}: {e}",
            path.display()
        ))),
    }
}
