//! Message and Conversation domain types.
//!
//! These are the value objects kept in chat history:
//! user asks a question → dispatcher routes it → backend answers → both turns land here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::ServiceId;

/// Title given to a conversation before its first message.
pub const DEFAULT_TITLE: &str = "New Conversation";

/// Longest title kept verbatim; longer first messages are cut and suffixed with `...`.
pub const TITLE_MAX_CHARS: usize = 30;

/// Unique identifier for a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI backend
    Assistant,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,

    /// Which backend produced an assistant message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceId>,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            service: None,
        }
    }

    /// Create a new assistant message answered by `service`.
    pub fn assistant(content: impl Into<String>, service: ServiceId) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            service: Some(service),
        }
    }
}

/// A conversation is an ordered sequence of messages under one title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: ConversationId,

    /// Sidebar title, derived from the first user message
    pub title: String,

    /// Ordered messages
    pub messages: Vec<Message>,

    /// When this conversation was created
    pub created_at: DateTime<Utc>,

    /// When the last message was added
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new empty conversation.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a message to the conversation.
    ///
    /// The first user message also names the conversation.
    pub fn push(&mut self, message: Message) {
        if self.messages.is_empty() && message.role == Role::User {
            self.title = title_from(&message.content);
        }
        self.updated_at = Utc::now();
        self.messages.push(message);
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a conversation title from its first message.
pub fn title_from(first_message: &str) -> String {
    if first_message.chars().count() > TITLE_MAX_CHARS {
        let head: String = first_message.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        first_message.to_string()
    }
}
