//! `switchboard chat` — Interactive chat with conversation history.

use std::io::Write;

use switchboard_core::ServiceId;
use switchboard_providers::OllamaBackend;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::CommandResult;

/// A line typed at the prompt.
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Quit,
    Empty,
    SwitchService(&'a str),
    SwitchModel(&'a str),
    NewConversation,
    UnknownCommand(&'a str),
    Question(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        return Input::Quit;
    }

    let Some(command) = line.strip_prefix('/') else {
        return Input::Question(line);
    };
    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map(|(n, a)| (n, a.trim()))
        .unwrap_or((command, ""));

    match name {
        "service" => Input::SwitchService(arg),
        "model" => Input::SwitchModel(arg),
        "new" => Input::NewConversation,
        "exit" | "quit" => Input::Quit,
        _ => Input::UnknownCommand(name),
    }
}

pub async fn run(service: Option<ServiceId>, model: Option<String>) -> CommandResult {
    let config = super::load_config()?;
    let dispatcher = super::dispatcher(&config)?;
    let mut history = super::open_history(&config);

    let mut service = service.unwrap_or(config.default_service);
    let mut model = model.or_else(|| config.default_model.clone());

    // Default to the first installed local model
    if model.is_none() {
        let models = OllamaBackend::new(config.backends.inference_url.as_str())
            .list_models()
            .await;
        model = models.into_iter().next();
    }

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║       Switchboard — Interactive Chat         ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Service:   {}", dispatcher.registry().get(service).display_name);
    println!("  Model:     {}", model.as_deref().unwrap_or("(none)"));
    if let Some(conversation) = history.as_ref().and_then(|h| h.current()) {
        println!("  History:   {} ({} messages)", conversation.title, conversation.messages.len());
    }
    println!();
    println!("  Commands:  /service <name>, /model <name>, /new");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            Input::Quit => break,
            Input::Empty => {}
            Input::SwitchService(name) => match name.parse::<ServiceId>() {
                Ok(id) => {
                    service = id;
                    println!("  Switched to {}", dispatcher.registry().get(id).display_name);
                }
                Err(e) => eprintln!("  [Error] {e}"),
            },
            Input::SwitchModel("") => eprintln!("  Usage: /model <name>"),
            Input::SwitchModel(name) => {
                model = Some(name.to_string());
                if !service.accepts_model() {
                    println!("  Model set to {name} (not used by {service})");
                } else {
                    println!("  Model set to {name}");
                }
            }
            Input::NewConversation => match history.as_mut() {
                Some(store) => {
                    store.create()?;
                    println!("  Started a new conversation");
                }
                None => println!("  History is disabled"),
            },
            Input::UnknownCommand(name) => eprintln!("  Unknown command: /{name}"),
            Input::Question(question) => {
                if let Some(store) = history.as_mut() {
                    store.record_user(question)?;
                }

                eprint!("  ...");
                match dispatcher.ask(question, service, model.as_deref()).await {
                    Ok(answer) => {
                        eprint!("\r     \r");
                        println!();
                        let label = dispatcher.registry().get(service).display_name;
                        for line in answer.lines() {
                            println!("  {label} > {line}");
                        }
                        println!();

                        if let Some(store) = history.as_mut() {
                            store.record_assistant(&answer, service)?;
                        }
                    }
                    Err(e) => {
                        eprint!("\r     \r");
                        eprintln!("  [Error] {e}");
                        println!();
                    }
                }
            }
        }
        prompt()?;
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}
