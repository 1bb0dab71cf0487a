//! `switchboard health` — Check every backend concurrently.

use switchboard_providers::ServiceDescriptor;

use super::CommandResult;

pub async fn run() -> CommandResult {
    let config = super::load_config()?;
    let dispatcher = super::dispatcher(&config)?;

    println!("🩺 Service Health");
    println!("=================");

    let statuses = dispatcher.check_all().await;
    for descriptor in dispatcher.registry().iter() {
        let healthy = statuses.get(&descriptor.id).copied().unwrap_or(false);
        println!("{}", status_line(descriptor, healthy));
    }

    let up = statuses.values().filter(|healthy| **healthy).count();
    println!();
    println!("  {up}/{} services reachable", statuses.len());

    Ok(())
}

fn status_line(descriptor: &ServiceDescriptor, healthy: bool) -> String {
    let (icon, word) = if healthy { ("✅", "up") } else { ("❌", "down") };
    format!(
        "  {icon} {:<24} {:<8} port {:<6} {word}",
        descriptor.display_name,
        descriptor.id.as_str(),
        descriptor.port,
    )
}
