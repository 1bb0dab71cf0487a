//! `switchboard models` — List models installed on the local inference server.

use switchboard_providers::OllamaBackend;

use super::CommandResult;

pub async fn run() -> CommandResult {
    let config = super::load_config()?;
    let backend = OllamaBackend::new(config.backends.inference_url.as_str());

    let models = backend.list_models().await;
    if models.is_empty() {
        println!("  No models found at {}", backend.base_url());
        println!("  Is Ollama running? Try `ollama pull llama2`.");
        return Ok(());
    }

    println!("📦 Local Models ({})", backend.base_url());
    println!("================");
    for name in &models {
        let marker = if config.default_model.as_deref() == Some(name.as_str()) {
            " (default)"
        } else {
            ""
        };
        println!("  • {name}{marker}");
    }

    Ok(())
}
