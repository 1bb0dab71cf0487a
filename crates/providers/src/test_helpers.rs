//! Shared test helpers for registry, dispatch and health tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use switchboard_core::error::ServiceError;
use switchboard_core::service::{Backend, ServiceId};

use crate::registry::ServiceRegistry;

/// A stub backend with a scripted answer and health outcome.
///
/// Records how often it was asked and which model hint it last received.
pub struct StubBackend {
    id: ServiceId,
    answer: Result<String, ServiceError>,
    health: Result<bool, ServiceError>,
    calls: AtomicUsize,
    last_model: Mutex<Option<String>>,
}

impl StubBackend {
    pub fn new(id: ServiceId) -> Self {
        Self {
            id,
            answer: Ok(format!("answer from {id}")),
            health: Ok(true),
            calls: AtomicUsize::new(0),
            last_model: Mutex::new(None),
        }
    }

    pub fn failing(id: ServiceId, error: ServiceError) -> Self {
        Self {
            answer: Err(error),
            ..Self::new(id)
        }
    }

    pub fn with_health(mut self, health: Result<bool, ServiceError>) -> Self {
        self.health = health;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_model(&self) -> Option<String> {
        self.last_model.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Backend for StubBackend {
    fn id(&self) -> ServiceId {
        self.id
    }

    async fn ask(&self, _question: &str, model: Option<&str>) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_model.lock().unwrap() = model.map(String::from);
        self.answer.clone()
    }

    async fn health_check(&self) -> Result<bool, ServiceError> {
        self.health.clone()
    }
}

/// The four stubs behind a registry, kept so tests can inspect them.
pub struct Stubs {
    pub rag: Arc<StubBackend>,
    pub graph: Arc<StubBackend>,
    pub crewai: Arc<StubBackend>,
    pub ollama: Arc<StubBackend>,
}

impl Stubs {
    pub fn healthy() -> Self {
        Self {
            rag: Arc::new(StubBackend::new(ServiceId::Rag)),
            graph: Arc::new(StubBackend::new(ServiceId::Graph)),
            crewai: Arc::new(StubBackend::new(ServiceId::CrewAi)),
            ollama: Arc::new(StubBackend::new(ServiceId::Ollama)),
        }
    }

    pub fn registry(&self) -> ServiceRegistry {
        ServiceRegistry::new(
            self.rag.clone(),
            self.graph.clone(),
            self.crewai.clone(),
            self.ollama.clone(),
        )
        .unwrap()
    }
}
