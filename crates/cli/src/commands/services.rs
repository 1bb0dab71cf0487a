//! `switchboard services` — Show the registered backends.

use super::CommandResult;

pub async fn run() -> CommandResult {
    let config = super::load_config()?;
    let dispatcher = super::dispatcher(&config)?;

    println!("🔌 Registered Services");
    println!("======================");
    println!();
    println!("  ┌──────────┬────────────────────────┬───────┬──────────────────────────────────┐");
    println!("  │ Name     │ Display name           │ Port  │ Description                      │");
    println!("  ├──────────┼────────────────────────┼───────┼──────────────────────────────────┤");
    for descriptor in dispatcher.registry().iter() {
        println!(
            "  │ {:<8} │ {:<22} │ {:<5} │ {:<32} │",
            descriptor.id.as_str(),
            descriptor.display_name,
            descriptor.port,
            descriptor.description,
        );
    }
    println!("  └──────────┴────────────────────────┴───────┴──────────────────────────────────┘");
    println!();
    println!("  Default service: {}", config.default_service);
    println!("  Environment variables:");
    println!("    SWITCHBOARD_SERVICE, SWITCHBOARD_MODEL");
    println!("    SWITCHBOARD_QUESTION_URL, SWITCHBOARD_INFERENCE_URL");

    Ok(())
}
