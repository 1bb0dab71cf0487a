//! Backend implementations for Switchboard.
//!
//! All adapters implement the `switchboard_core::Backend` trait.
//! The registry maps each `ServiceId` to its adapter; the dispatcher routes
//! questions through it.

pub mod dispatch;
pub mod health;
pub mod ollama;
pub mod question;
pub mod registry;
pub mod stream;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use dispatch::Dispatcher;
pub use health::check_all;
pub use ollama::OllamaBackend;
pub use question::QuestionBackend;
pub use registry::{ServiceDescriptor, ServiceRegistry};
pub use stream::StreamDecoder;
