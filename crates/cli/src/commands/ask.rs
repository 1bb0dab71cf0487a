//! `switchboard ask` — Send a single question and print the answer.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use switchboard_core::ServiceId;
use switchboard_providers::OllamaBackend;
use tracing::warn;

use super::CommandResult;

pub async fn run(
    question: String,
    service: Option<ServiceId>,
    model: Option<String>,
    images: Vec<PathBuf>,
    no_history: bool,
) -> CommandResult {
    let config = super::load_config()?;
    let service = service.unwrap_or(config.default_service);
    let model = model.or_else(|| config.default_model.clone());

    let question = question.trim();
    if question.is_empty() {
        return Err("Question must not be empty".into());
    }

    // Everything that can fail locally happens before the turn is recorded
    let encoded = if service == ServiceId::Ollama {
        encode_images(&images)?
    } else {
        if !images.is_empty() {
            warn!(service = %service, "Images are only sent to ollama; ignoring them");
        }
        Vec::new()
    };
    let dispatcher = super::dispatcher(&config)?;

    let mut history = if no_history {
        None
    } else {
        super::open_history(&config)
    };
    if let Some(store) = history.as_mut() {
        store.record_user(question)?;
    }

    let answer = if encoded.is_empty() {
        dispatcher.ask(question, service, model.as_deref()).await?
    } else {
        OllamaBackend::new(config.backends.inference_url.as_str())
            .generate(question, model.as_deref(), &encoded)
            .await
    };

    if let Some(store) = history.as_mut() {
        store.record_assistant(&answer, service)?;
    }

    println!("{answer}");
    Ok(())
}

/// Read each file and base64-encode it for the generate request.
fn encode_images(paths: &[PathBuf]) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    paths.iter().map(|path| encode_image(path)).collect()
}

fn encode_image(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("Failed to read image {}: {e}", path.display()))?;
    Ok(STANDARD.encode(bytes))
}
