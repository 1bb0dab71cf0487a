//! # Switchboard Core
//!
//! Domain types, traits, and error definitions for the Switchboard chat client.
//! This crate has **zero HTTP dependencies** — it defines the domain model
//! that the adapters, history store and CLI implement against.
//!
//! ## Design Philosophy
//!
//! Every backend is reached through the `Backend` trait defined here.
//! Implementations live in `switchboard-providers`, which makes it easy to
//! test dispatch with stub backends.

pub mod error;
pub mod message;
pub mod service;

// Re-export key types at crate root for ergonomics
pub use error::{Error, HistoryError, Result, ServiceError};
pub use message::{Conversation, ConversationId, Message, Role};
pub use service::{Backend, HealthStatusMap, ServiceId};
