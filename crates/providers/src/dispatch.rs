//! Dispatcher — routes a question to the backend named by a `ServiceId`.
//!
//! No retry and no fallback to another backend: a failed ask is logged with
//! the backend's display name and handed back to the caller unchanged.

use std::sync::Arc;

use switchboard_core::error::ServiceError;
use switchboard_core::service::{HealthStatusMap, ServiceId};
use tracing::{debug, error, warn};

use crate::health;
use crate::registry::ServiceRegistry;

/// Routes requests through a shared, read-only service registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ServiceRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Ask `service` a question.
    ///
    /// The model hint only reaches backends that accept one.
    pub async fn ask(
        &self,
        question: &str,
        service: ServiceId,
        model: Option<&str>,
    ) -> Result<String, ServiceError> {
        let descriptor = self.registry.get(service);
        let model = model.filter(|_| service.accepts_model());

        debug!(service = %descriptor.display_name, model = ?model, "Dispatching question");

        descriptor
            .backend()
            .ask(question, model)
            .await
            .inspect_err(|e| {
                error!(service = %descriptor.display_name, error = %e, "{} Error", descriptor.display_name);
            })
    }

    /// Is `service` reachable? Never fails; errors count as `false`.
    pub async fn check_health(&self, service: ServiceId) -> bool {
        let descriptor = self.registry.get(service);

        match descriptor.backend().health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!(service = %descriptor.display_name, error = %e, "Health check error");
                false
            }
        }
    }

    /// Health of every registered service.
    pub async fn check_all(&self) -> HealthStatusMap {
        health::check_all(&self.registry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{StubBackend, Stubs};

    fn dispatcher(stubs: &Stubs) -> Dispatcher {
        Dispatcher::new(Arc::new(stubs.registry()))
    }

    #[tokio::test]
    async fn routes_to_selected_backend() {
        let stubs = Stubs::healthy();
        let dispatcher = dispatcher(&stubs);

        let answer = dispatcher
            .ask("Busiest floor?", ServiceId::Graph, Some("mistral"))
            .await
            .unwrap();

        assert_eq!(answer, "answer from graph");
        assert_eq!(stubs.graph.calls(), 1);
        assert_eq!(stubs.graph.last_model().as_deref(), Some("mistral"));
        assert_eq!(stubs.rag.calls(), 0);
        assert_eq!(stubs.crewai.calls(), 0);
        assert_eq!(stubs.ollama.calls(), 0);
    }

    #[tokio::test]
    async fn crewai_never_sees_model_hint() {
        let stubs = Stubs::healthy();
        let dispatcher = dispatcher(&stubs);

        dispatcher
            .ask("What is 2+2?", ServiceId::CrewAi, Some("llama2"))
            .await
            .unwrap();

        assert_eq!(stubs.crewai.calls(), 1);
        assert_eq!(stubs.crewai.last_model(), None);
    }

    #[tokio::test]
    async fn failure_is_returned_unchanged_without_fallback() {
        let stubs = Stubs {
            rag: Arc::new(StubBackend::failing(
                ServiceId::Rag,
                ServiceError::Http {
                    service: "RAG chatbot".into(),
                    status: 500,
                },
            )),
            ..Stubs::healthy()
        };
        let dispatcher = dispatcher(&stubs);

        let err = dispatcher
            .ask("Busiest floor?", ServiceId::Rag, None)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(stubs.rag.calls(), 1);
        assert_eq!(stubs.graph.calls(), 0);
        assert_eq!(stubs.ollama.calls(), 0);
    }

    #[tokio::test]
    async fn check_health_swallows_errors() {
        let stubs = Stubs {
            ollama: Arc::new(StubBackend::new(ServiceId::Ollama).with_health(Err(
                ServiceError::Network {
                    service: "Ollama".into(),
                    message: "timed out".into(),
                },
            ))),
            ..Stubs::healthy()
        };
        let dispatcher = dispatcher(&stubs);

        assert!(!dispatcher.check_health(ServiceId::Ollama).await);
        assert!(dispatcher.check_health(ServiceId::Rag).await);
    }

    #[tokio::test]
    async fn check_all_reports_every_service() {
        let stubs = Stubs::healthy();
        let status = dispatcher(&stubs).check_all().await;
        assert_eq!(status.keys().copied().collect::<Vec<_>>(), ServiceId::ALL.to_vec());
    }
}
