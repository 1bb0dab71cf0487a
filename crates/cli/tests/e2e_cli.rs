//! End-to-end tests that drive the `switchboard` binary against local
//! test servers, with `HOME` pointed at a scratch directory.

use std::path::Path;
use std::process::Output;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::process::Command;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn closed_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn switchboard(home: &Path, question_url: &str, args: &[&str]) -> Output {
    switchboard_with(home, question_url, &closed_url(), args).await
}

async fn switchboard_with(
    home: &Path,
    question_url: &str,
    inference_url: &str,
    args: &[&str],
) -> Output {
    Command::new(env!("CARGO_BIN_EXE_switchboard"))
        .args(args)
        .env("HOME", home)
        .env("SWITCHBOARD_QUESTION_URL", question_url)
        .env("SWITCHBOARD_INFERENCE_URL", inference_url)
        .env_remove("SWITCHBOARD_SERVICE")
        .env_remove("SWITCHBOARD_MODEL")
        .env_remove("RUST_LOG")
        .output()
        .await
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[tokio::test]
async fn ask_prints_answer_and_records_turn() {
    let home = tempfile::tempdir().unwrap();
    let url = serve(Router::new().route(
        "/rag/query",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["question"], "What is 6*7?");
            Json(json!({ "answer": "42" }))
        }),
    ))
    .await;

    let output = switchboard(home.path(), &url, &["ask", "What is 6*7?"]).await;
    assert!(output.status.success());
    assert_eq!(stdout(&output), "42\n");

    let shown = switchboard(home.path(), &url, &["history", "show"]).await;
    let transcript = stdout(&shown);
    assert!(transcript.contains("You > What is 6*7?"));
    assert!(transcript.contains("rag > 42"));
}

#[tokio::test]
async fn ask_sends_no_model_hint_unless_configured() {
    let home = tempfile::tempdir().unwrap();
    let url = serve(
        Router::new()
            .route(
                "/api/tags",
                get(|| async { Json(json!({ "models": [{ "name": "llama2" }] })) }),
            )
            .route(
                "/rag/query",
                post(|Json(body): Json<Value>| async move {
                    let answer = match body.get("model") {
                        Some(model) => format!("model {model}"),
                        None => "no model".to_string(),
                    };
                    Json(json!({ "answer": answer }))
                }),
            ),
    )
    .await;

    let output = switchboard_with(home.path(), &url, &url, &["ask", "hi", "--no-history"]).await;
    assert_eq!(stdout(&output), "no model\n");

    let output = switchboard_with(
        home.path(),
        &url,
        &url,
        &["ask", "hi", "-m", "mistral", "--no-history"],
    )
    .await;
    assert_eq!(stdout(&output), "model \"mistral\"\n");
}

#[tokio::test]
async fn no_history_leaves_nothing_behind() {
    let home = tempfile::tempdir().unwrap();
    let url = serve(Router::new().route(
        "/graph/query",
        post(|| async { Json(json!({ "answer": "Floor 3" })) }),
    ))
    .await;

    let output = switchboard(
        home.path(),
        &url,
        &["ask", "Busiest floor?", "--service", "graph", "--no-history"],
    )
    .await;
    assert_eq!(stdout(&output), "Floor 3\n");

    let listed = switchboard(home.path(), &url, &["history", "list"]).await;
    assert!(stdout(&listed).contains("No saved conversations"));
}

#[tokio::test]
async fn failed_ask_keeps_question_without_answer() {
    let home = tempfile::tempdir().unwrap();
    let url = serve(Router::new().route(
        "/crewai/query",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    ))
    .await;

    let output = switchboard(home.path(), &url, &["ask", "Plan my day", "-s", "crewai"]).await;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("CrewAI"));

    let shown = switchboard(home.path(), &url, &["history", "show"]).await;
    let transcript = stdout(&shown);
    assert!(transcript.contains("You > Plan my day"));
    assert!(!transcript.contains("crewai >"));
}

#[tokio::test]
async fn unreadable_image_records_nothing() {
    let home = tempfile::tempdir().unwrap();
    let missing = home.path().join("missing.png");
    let url = closed_url();

    let output = switchboard(
        home.path(),
        &url,
        &["ask", "What is this?", "-s", "ollama", "-i", missing.to_str().unwrap()],
    )
    .await;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read image"));

    let listed = switchboard(home.path(), &url, &["history", "list"]).await;
    assert!(stdout(&listed).contains("No saved conversations"));
}

#[tokio::test]
async fn history_new_and_clear() {
    let home = tempfile::tempdir().unwrap();
    let url = closed_url();

    let created = switchboard(home.path(), &url, &["history", "new"]).await;
    assert!(stdout(&created).contains("Started conversation"));

    let listed = switchboard(home.path(), &url, &["history"]).await;
    assert!(stdout(&listed).contains("New Conversation"));

    let cleared = switchboard(home.path(), &url, &["history", "clear"]).await;
    assert!(stdout(&cleared).contains("Cleared 1 conversation(s)"));
    assert!(!home.path().join(".switchboard/history/conversations.json").exists());
}

#[tokio::test]
async fn status_reports_effective_urls() {
    let home = tempfile::tempdir().unwrap();
    let url = closed_url();

    let output = switchboard(home.path(), &url, &["status"]).await;
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains(&url));
    assert!(text.contains("No config file"));
}

#[tokio::test]
async fn health_reports_unreachable_services_as_down() {
    let home = tempfile::tempdir().unwrap();
    let output = switchboard(home.path(), &closed_url(), &["health"]).await;

    assert!(output.status.success());
    let text = stdout(&output);
    assert_eq!(text.matches("down").count(), 4);
    assert!(text.contains("0/4 services reachable"));
}
