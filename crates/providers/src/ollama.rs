//! Direct local inference against an Ollama server.
//!
//! Talks to the native `/api/generate` endpoint (not the OpenAI-compatible
//! `/v1` surface), which streams newline-delimited JSON by default.
//!
//! This adapter never raises from `ask`: transport faults and error statuses
//! come back as in-band `Error: ...` text so the caller always has something
//! to display.

use async_trait::async_trait;
use futures::StreamExt;
use serde::Serialize;
use switchboard_core::error::ServiceError;
use switchboard_core::service::{Backend, ServiceId};
use tracing::{debug, warn};

use crate::question::normalize;
use crate::stream::StreamDecoder;

/// Model used when the caller gives no hint.
pub const DEFAULT_MODEL: &str = "llama2";

/// An adapter for a local Ollama server.
pub struct OllamaBackend {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaBackend {
    /// Create a backend for the server at `base_url` (e.g. `http://localhost:11434`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
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

    /// Generate a completion for `prompt`, optionally with base64 images.
    ///
    /// Always returns displayable text; failures are rendered as `Error: ...`.
    pub async fn generate(&self, prompt: &str, model: Option<&str>, images: &[String]) -> String {
        match self.try_generate(prompt, model, images).await {
            Ok(answer) => answer,
            Err(message) => {
                warn!(error = %message, "Ollama generate failed");
                format!("Error: {message}")
            }
        }
    }

    async fn try_generate(
        &self,
        prompt: &str,
        model: Option<&str>,
        images: &[String],
    ) -> Result<String, String> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: model.unwrap_or(DEFAULT_MODEL),
            prompt,
            images: (!images.is_empty()).then_some(images),
        };

        debug!(model = %body.model, images = images.len(), "Sending generate request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), "Ollama returned error status");
            return Err("Ollama API error".into());
        }

        // Sized or chunked, the body is read incrementally; `finish` falls
        // back to a whole-body parse when no line yields text.
        let mut decoder = StreamDecoder::new();
        let mut byte_stream = response.bytes_stream();

        while let Some(chunk) = byte_stream.next().await {
            let bytes = chunk.map_err(|e| e.to_string())?;
            decoder.feed(&bytes);
        }

        Ok(decoder.finish())
    }

    /// List the models installed on the server, in the order it reports them.
    ///
    /// Any failure yields an empty list.
    pub async fn list_models(&self) -> Vec<String> {
        let url = format!("{}/api/tags", self.base_url);

        let response = match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!(status = response.status().as_u16(), "Failed to fetch Ollama models");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch Ollama models");
                return Vec::new();
            }
        };

        let body: serde_json::Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to parse Ollama model list");
                return Vec::new();
            }
        };

        model_names(&body)
    }
}

fn model_names(body: &serde_json::Value) -> Vec<String> {
    body["models"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|m| m["name"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl Backend for OllamaBackend {
    fn id(&self) -> ServiceId {
        ServiceId::Ollama
    }

    async fn ask(&self, question: &str, model: Option<&str>) -> Result<String, ServiceError> {
        Ok(self.generate(question, model, &[]).await)
    }

    /// Ollama has no `/health`; a successful tag listing means it is up.
    async fn health_check(&self) -> Result<bool, ServiceError> {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                warn!(error = %e, "Ollama health check failed");
                Ok(false)
            }
        }
    }
}

// --- Ollama API types (internal) ---

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<&'a [String]>,
}
