//! Error types for the Switchboard domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

/// The top-level error type for all Switchboard operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Backend errors ---
    #[error(transparent)]
    Service(#[from] ServiceError),

    // --- History errors ---
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    // --- Dispatch ---
    #[error("Unknown AI service: {0}")]
    UnknownService(String),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// A fault raised by one of the question-answering adapters.
///
/// The `service` field carries the backend's label so every message reads
/// `Failed to get response from <backend>: ...`.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("Failed to get response from {service}: HTTP error! status: {status}")]
    Http { service: String, status: u16 },

    #[error("Failed to get response from {service}: {message}")]
    Network { service: String, message: String },

    #[error("Failed to get response from {service}: invalid response body: {message}")]
    Decode { service: String, message: String },
}

impl ServiceError {
    /// The HTTP status carried by this fault, if it is a protocol fault.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Conversation not found: {0}")]
    NotFound(String),
}
