//! `switchboard status` — Show effective configuration.

use switchboard_config::AppConfig;

use super::CommandResult;

pub async fn run() -> CommandResult {
    let config = super::load_config()?;

    println!("📡 Switchboard Status");
    println!("====================");
    println!("  Config dir:     {}", AppConfig::config_dir().display());
    println!("  Service:        {}", config.default_service);
    println!("  Model:          {}", config.default_model.as_deref().unwrap_or("(auto)"));
    println!("  Question URL:   {}", config.backends.question_url);
    println!("  Inference URL:  {}", config.backends.inference_url);
    println!(
        "  History:        {}",
        if config.history.enabled { "enabled" } else { "disabled" }
    );
    println!("  History dir:    {}", config.history_dir().display());

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — using defaults");
        println!("  Example:\n");
        for line in AppConfig::default_toml().lines() {
            println!("    {line}");
        }
    }

    Ok(())
}
