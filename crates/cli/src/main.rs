//! Switchboard CLI — the main entry point.
//!
//! Commands:
//! - `ask`      — Send one question to a backend
//! - `chat`     — Interactive chat with history
//! - `health`   — Check every backend
//! - `models`   — List local inference models
//! - `services` — Show the service registry
//! - `history`  — Manage saved conversations
//! - `status`   — Show effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use switchboard_core::ServiceId;

mod commands;

#[derive(Parser)]
#[command(
    name = "switchboard",
    about = "Switchboard — route chat questions to local AI backends",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a single question and print the answer
    Ask {
        /// The question to send
        question: String,

        /// Backend to ask: rag, graph, crewai or ollama
        #[arg(short, long)]
        service: Option<ServiceId>,

        /// Model hint for backends that accept one
        #[arg(short, long)]
        model: Option<String>,

        /// Attach an image (local inference only); may be repeated
        #[arg(short, long = "image")]
        images: Vec<PathBuf>,

        /// Do not record this turn in conversation history
        #[arg(long)]
        no_history: bool,
    },

    /// Chat interactively
    Chat {
        /// Backend to start with
        #[arg(short, long)]
        service: Option<ServiceId>,

        /// Model hint to start with
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Check the health of every backend
    Health,

    /// List models available for local inference
    Models,

    /// Show the registered backends
    Services,

    /// Manage conversation history
    History {
        #[command(subcommand)]
        action: Option<commands::history::HistoryAction>,
    },

    /// Show effective configuration
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for answers
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Ask {
            question,
            service,
            model,
            images,
            no_history,
        } => commands::ask::run(question, service, model, images, no_history).await?,
        Commands::Chat { service, model } => commands::chat::run(service, model).await?,
        Commands::Health => commands::health::run().await?,
        Commands::Models => commands::models::run().await?,
        Commands::Services => commands::services::run().await?,
        Commands::History { action } => commands::history::run(action).await?,
        Commands::Status => commands::status::run().await?,
    }

    Ok(())
}
