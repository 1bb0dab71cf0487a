//! Health aggregation across every registered service.

use futures::future::join_all;
use switchboard_core::service::{HealthStatusMap, ServiceId};
use tracing::warn;

use crate::registry::ServiceRegistry;

/// Check every service concurrently.
///
/// The map always holds one entry per service; a check that fails counts
/// as unhealthy.
pub async fn check_all(registry: &ServiceRegistry) -> HealthStatusMap {
    let mut status: HealthStatusMap = ServiceId::ALL.into_iter().map(|id| (id, false)).collect();

    let checks = registry.iter().map(|descriptor| async move {
        (descriptor, descriptor.backend().health_check().await)
    });

    for (descriptor, result) in join_all(checks).await {
        match result {
            Ok(healthy) => {
                status.insert(descriptor.id, healthy);
            }
            Err(e) => {
                warn!(service = %descriptor.display_name, error = %e, "Health check error");
            }
        }
    }

    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{StubBackend, Stubs};
    use std::sync::Arc;
    use switchboard_core::error::ServiceError;

    #[tokio::test]
    async fn all_healthy() {
        let registry = Stubs::healthy().registry();
        let status = check_all(&registry).await;
        assert_eq!(status.len(), 4);
        assert!(status.values().all(|healthy| *healthy));
    }

    #[tokio::test]
    async fn failed_check_counts_as_unhealthy() {
        let stubs = Stubs {
            graph: Arc::new(StubBackend::new(ServiceId::Graph).with_health(Ok(false))),
            crewai: Arc::new(StubBackend::new(ServiceId::CrewAi).with_health(Err(
                ServiceError::Network {
                    service: "CrewAI".into(),
                    message: "connection refused".into(),
                },
            ))),
            ..Stubs::healthy()
        };

        let status = check_all(&stubs.registry()).await;

        assert_eq!(status.len(), 4);
        assert!(status[&ServiceId::Rag]);
        assert!(!status[&ServiceId::Graph]);
        assert!(!status[&ServiceId::CrewAi]);
        assert!(status[&ServiceId::Ollama]);
    }
}
