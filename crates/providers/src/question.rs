//! Question-answering backends hosted by the shared AI process.
//!
//! RAG, Graph and CrewAI differ only in endpoint path, request shape, the
//! field holding the answer, and the placeholder used when that field is
//! empty. One adapter type covers all three; the convenience constructors
//! pin those details.
//!
//! Unlike the local inference backend, these adapters raise their faults:
//! transport errors, non-success statuses and non-JSON bodies all surface
//! as `ServiceError` with a backend-specific prefix.

use async_trait::async_trait;
use serde_json::{Value, json};
use switchboard_core::error::ServiceError;
use switchboard_core::service::{Backend, ServiceId};
use tracing::{debug, warn};

/// How the question is named in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestShape {
    /// `{"question": ..., "model": ...}`
    Question,
    /// `{"query": ...}`, no model
    Query,
}

/// An adapter for one of the question-answering endpoints.
pub struct QuestionBackend {
    id: ServiceId,
    label: &'static str,
    path: &'static str,
    shape: RequestShape,
    answer_field: &'static str,
    placeholder: &'static str,
    base_url: String,
    client: reqwest::Client,
}

impl QuestionBackend {
    /// The retrieval-augmented backend (`POST /rag/query`).
    pub fn rag(base_url: impl Into<String>) -> Self {
        Self {
            id: ServiceId::Rag,
            label: "RAG chatbot",
            path: "/rag/query",
            shape: RequestShape::Question,
            answer_field: "answer",
            placeholder: "No response from RAG chatbot",
            base_url: normalize(base_url.into()),
            client: reqwest::Client::new(),
        }
    }

    /// The graph backend (`POST /graph/query`).
    pub fn graph(base_url: impl Into<String>) -> Self {
        Self {
            id: ServiceId::Graph,
            label: "Graph chatbot",
            path: "/graph/query",
            shape: RequestShape::Question,
            answer_field: "answer",
            placeholder: "No response from Graph chatbot",
            base_url: normalize(base_url.into()),
            client: reqwest::Client::new(),
        }
    }

    /// The multi-agent backend (`POST /crewai/query`).
    pub fn crewai(base_url: impl Into<String>) -> Self {
        Self {
            id: ServiceId::CrewAi,
            label: "CrewAI",
            path: "/crewai/query",
            shape: RequestShape::Query,
            answer_field: "result",
            placeholder: "No response from CrewAI",
            base_url: normalize(base_url.into()),
            client: reqwest::Client::new(),
        }
    }

    /// Share an existing HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the JSON request body for a question.
    pub fn request_body(&self, question: &str, model: Option<&str>) -> Value {
        match self.shape {
            RequestShape::Query => json!({ "query": question }),
            RequestShape::Question => {
                let mut body = json!({ "question": question });
                if let Some(model) = model {
                    body["model"] = json!(model);
                }
                body
            }
        }
    }

    /// Pull the answer out of a response body, substituting the placeholder
    /// when the field is missing, empty, or not a string.
    fn extract_answer(&self, data: &Value) -> String {
        data.get(self.answer_field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.placeholder)
            .to_string()
    }

    fn network_error(&self, e: reqwest::Error) -> ServiceError {
        ServiceError::Network {
            service: self.label.to_string(),
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl Backend for QuestionBackend {
    fn id(&self) -> ServiceId {
        self.id
    }

    async fn ask(&self, question: &str, model: Option<&str>) -> Result<String, ServiceError> {
        let url = format!("{}{}", self.base_url, self.path);
        let body = self.request_body(question, model);

        debug!(service = %self.id, url = %url, "Sending question");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(service = %self.id, status = status.as_u16(), "Backend returned error status");
            return Err(ServiceError::Http {
                service: self.label.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|e| self.network_error(e))?;
        let data: Value = serde_json::from_str(&text).map_err(|e| ServiceError::Decode {
            service: self.label.to_string(),
            message: e.to_string(),
        })?;

        Ok(self.extract_answer(&data))
    }

    async fn health_check(&self) -> Result<bool, ServiceError> {
        let url = format!("{}/health", self.base_url);

        match self
            .client
            .get(&url)
            .header("Content-Type", "application/json")
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                warn!(service = %self.id, error = %e, "Health check failed");
                Ok(false)
            }
        }
    }
}

pub(crate) fn normalize(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}
