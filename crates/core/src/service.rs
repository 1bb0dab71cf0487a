//! Service identity and the Backend trait — the abstraction over AI backends.
//!
//! A Backend knows how to send one question to a locally hosted AI service
//! and return its answer, and how to probe whether that service is up.
//!
//! Implementations: RAG, Graph, CrewAI (question backends) and Ollama
//! (direct local inference).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, ServiceError};

/// Selects one of the four AI backends.
///
/// The set is closed: every variant has exactly one descriptor in the
/// service registry, so dispatch never fails on lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceId {
    /// Retrieval-augmented generation over a vector index
    Rag,
    /// Graph-based question answering
    Graph,
    /// Multi-agent crew
    #[serde(rename = "crewai")]
    CrewAi,
    /// Direct local model inference
    Ollama,
}

impl ServiceId {
    /// Every identifier, in registry order.
    pub const ALL: [ServiceId; 4] = [
        ServiceId::Rag,
        ServiceId::Graph,
        ServiceId::CrewAi,
        ServiceId::Ollama,
    ];

    /// The short name used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rag => "rag",
            Self::Graph => "graph",
            Self::CrewAi => "crewai",
            Self::Ollama => "ollama",
        }
    }

    /// Whether the backend accepts a model hint alongside the question.
    pub fn accepts_model(&self) -> bool {
        !matches!(self, Self::CrewAi)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rag" => Ok(Self::Rag),
            "graph" => Ok(Self::Graph),
            "crewai" | "crew" => Ok(Self::CrewAi),
            "ollama" => Ok(Self::Ollama),
            other => Err(Error::UnknownService(other.to_string())),
        }
    }
}

/// Per-service health, one entry per registered identifier.
pub type HealthStatusMap = BTreeMap<ServiceId, bool>;

/// The core Backend trait.
///
/// The dispatcher calls `ask()` or `health_check()` without knowing which
/// backend sits behind the identifier.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Which service this backend implements.
    fn id(&self) -> ServiceId;

    /// Send one question and return the answer text.
    ///
    /// `model` is a hint; backends that take no model ignore it.
    async fn ask(&self, question: &str, model: Option<&str>) -> Result<String, ServiceError>;

    /// Can we reach the backend?
    async fn health_check(&self) -> Result<bool, ServiceError>;
}
