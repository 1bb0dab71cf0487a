//! Service registry — one descriptor per backend, built once at startup.
//!
//! The registry holds a field per `ServiceId` variant, so lookup is an
//! exhaustive match: adding a variant without a descriptor does not compile.
//! It is never mutated after construction; share it behind an `Arc`.

use std::sync::Arc;

use switchboard_config::AppConfig;
use switchboard_core::error::Error;
use switchboard_core::service::{Backend, ServiceId};

use crate::ollama::OllamaBackend;
use crate::question::QuestionBackend;

/// Static metadata plus the backend answering for one service.
pub struct ServiceDescriptor {
    pub id: ServiceId,
    pub display_name: &'static str,
    pub description: &'static str,
    pub port: u16,
    backend: Arc<dyn Backend>,
}

impl ServiceDescriptor {
    fn new(id: ServiceId, backend: Arc<dyn Backend>) -> Self {
        let (display_name, description, port) = match id {
            ServiceId::Rag => (
                "RAG Chatbot",
                "RAG-based chatbot using FAISS vector search",
                8000,
            ),
            ServiceId::Graph => ("Graph Chatbot", "Graph-based chatbot using Neo4j", 8000),
            ServiceId::CrewAi => ("CrewAI Multi-Agent", "Multi-agent system using CrewAI", 8000),
            ServiceId::Ollama => ("Ollama", "Direct local model inference", 11434),
        };

        Self {
            id,
            display_name,
            description,
            port,
            backend,
        }
    }

    /// The backend answering for this service.
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }
}

impl std::fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

/// Read-only mapping from `ServiceId` to its descriptor.
#[derive(Debug)]
pub struct ServiceRegistry {
    rag: ServiceDescriptor,
    graph: ServiceDescriptor,
    crewai: ServiceDescriptor,
    ollama: ServiceDescriptor,
}

impl ServiceRegistry {
    /// Build a registry from one backend per service.
    ///
    /// Fails if a backend reports a different identifier than its slot.
    pub fn new(
        rag: Arc<dyn Backend>,
        graph: Arc<dyn Backend>,
        crewai: Arc<dyn Backend>,
        ollama: Arc<dyn Backend>,
    ) -> Result<Self, Error> {
        Ok(Self {
            rag: slot(ServiceId::Rag, rag)?,
            graph: slot(ServiceId::Graph, graph)?,
            crewai: slot(ServiceId::CrewAi, crewai)?,
            ollama: slot(ServiceId::Ollama, ollama)?,
        })
    }

    /// Build the real HTTP adapters from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let client = reqwest::Client::new();
        let question_url = config.backends.question_url.as_str();
        let inference_url = config.backends.inference_url.as_str();

        let mut registry = Self::new(
            Arc::new(QuestionBackend::rag(question_url).with_client(client.clone())),
            Arc::new(QuestionBackend::graph(question_url).with_client(client.clone())),
            Arc::new(QuestionBackend::crewai(question_url).with_client(client.clone())),
            Arc::new(OllamaBackend::new(inference_url).with_client(client)),
        )?;

        let question_port = port_of(question_url);
        for id in [ServiceId::Rag, ServiceId::Graph, ServiceId::CrewAi] {
            registry.replace_port(id, question_port);
        }
        registry.replace_port(ServiceId::Ollama, port_of(inference_url));

        Ok(registry)
    }

    /// Look up the descriptor for `id`.
    pub fn get(&self, id: ServiceId) -> &ServiceDescriptor {
        match id {
            ServiceId::Rag => &self.rag,
            ServiceId::Graph => &self.graph,
            ServiceId::CrewAi => &self.crewai,
            ServiceId::Ollama => &self.ollama,
        }
    }

    /// All descriptors, in `ServiceId::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        ServiceId::ALL.into_iter().map(move |id| self.get(id))
    }

    fn replace_port(&mut self, id: ServiceId, port: Option<u16>) {
        let descriptor = match id {
            ServiceId::Rag => &mut self.rag,
            ServiceId::Graph => &mut self.graph,
            ServiceId::CrewAi => &mut self.crewai,
            ServiceId::Ollama => &mut self.ollama,
        };
        descriptor.port = port.unwrap_or(descriptor.port);
    }
}

fn slot(expected: ServiceId, backend: Arc<dyn Backend>) -> Result<ServiceDescriptor, Error> {
    let actual = backend.id();
    if actual != expected {
        return Err(Error::Config {
            message: format!("backend for '{expected}' reports itself as '{actual}'"),
        });
    }
    Ok(ServiceDescriptor::new(expected, backend))
}

/// Port of a base URL, explicit or scheme default.
fn port_of(base_url: &str) -> Option<u16> {
    reqwest::Url::parse(base_url)
        .ok()
        .and_then(|url| url.port_or_known_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_id_maps_to_matching_descriptor() {
        let registry = ServiceRegistry::from_config(&AppConfig::default()).unwrap();
        for id in ServiceId::ALL {
            let descriptor = registry.get(id);
            assert_eq!(descriptor.id, id);
            assert_eq!(descriptor.backend().id(), id);
        }
    }

    #[test]
    fn iteration_covers_all_services_in_order() {
        let registry = ServiceRegistry::from_config(&AppConfig::default()).unwrap();
        let ids: Vec<_> = registry.iter().map(|d| d.id).collect();
        assert_eq!(ids, ServiceId::ALL.to_vec());
    }

    #[test]
    fn default_ports() {
        let registry = ServiceRegistry::from_config(&AppConfig::default()).unwrap();
        assert_eq!(registry.get(ServiceId::Rag).port, 8000);
        assert_eq!(registry.get(ServiceId::CrewAi).port, 8000);
        assert_eq!(registry.get(ServiceId::Ollama).port, 11434);
        assert_eq!(registry.get(ServiceId::Graph).display_name, "Graph Chatbot");
    }

    #[test]
    fn ports_follow_configured_urls() {
        let mut config = AppConfig::default();
        config.backends.question_url = "http://10.0.0.5:9000".into();
        config.backends.inference_url = "https://gpu.internal".into();

        let registry = ServiceRegistry::from_config(&config).unwrap();
        assert_eq!(registry.get(ServiceId::Graph).port, 9000);
        assert_eq!(registry.get(ServiceId::Ollama).port, 443);
    }

    #[test]
    fn mismatched_backend_is_rejected() {
        let rag: Arc<dyn Backend> = Arc::new(QuestionBackend::rag("http://localhost:8000"));
        let graph: Arc<dyn Backend> = Arc::new(QuestionBackend::graph("http://localhost:8000"));
        let ollama: Arc<dyn Backend> = Arc::new(OllamaBackend::new("http://localhost:11434"));

        // Graph adapter placed in the CrewAI slot
        let err = ServiceRegistry::new(rag, graph.clone(), graph, ollama).unwrap_err();
        assert!(err.to_string().contains("crewai"));
    }
}
