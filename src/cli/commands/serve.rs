//! HTTP question page and JSON API.
//!
//! Indexing runs before the listener binds, so the page is only reachable
//! once the corpus is searchable.

use crate::cli::{Output, StartupArgs};
use crate::config::Settings;
use crate::error::FolioError;
use crate::rag::{RagEngine, RetrievedChunk};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Shared application state.
struct AppState {
    engine: RagEngine,
}

/// Run the HTTP server.
pub async fn run_serve(
    startup: &StartupArgs,
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let orchestrator = crate::cli::start(settings, startup).await?;
    let state = Arc::new(AppState {
        engine: orchestrator.rag_engine(),
    });

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Folio");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Question page", "GET  /");
    Output::kv("Ask (RAG)", "POST /ask");
    Output::kv("Health", "GET  /health");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/ask", post(ask))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AskRequest {
    question: String,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
    sources: Vec<SourceInfo>,
}

#[derive(Serialize)]
struct SourceInfo {
    source: String,
    score: f32,
    content: String,
}

impl From<RetrievedChunk> for SourceInfo {
    fn from(chunk: RetrievedChunk) -> Self {
        Self {
            source: chunk.source,
            score: chunk.score,
            content: chunk.text,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn ask(State(state): State<Arc<AppState>>, Json(req): Json<AskRequest>) -> impl IntoResponse {
    match state.engine.ask(&req.question).await {
        Ok(response) => Json(AskResponse {
            answer: response.answer,
            sources: response.sources.into_iter().map(SourceInfo::from).collect(),
        })
        .into_response(),
        Err(e) => {
            // A failed question must not take the server down; report it to the caller.
            let status = match e {
                FolioError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            };
            warn!("Question failed: {}", e);
            (
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Folio</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 46rem; margin: 3rem auto; padding: 0 1rem; }
  textarea { width: 100%; font-size: 1rem; }
  #answer { white-space: pre-wrap; margin-top: 1.5rem; }
  #sources { color: #666; font-size: 0.9rem; }
  .error { color: #b00020; }
</style>
</head>
<body>
<h2>Document assistant</h2>
<p>Answers questions based on the content of the indexed PDFs.</p>
<form id="form">
  <textarea id="question" rows="3" placeholder="Who is the author?"></textarea>
  <p><button type="submit">Answer</button></p>
</form>
<div id="answer"></div>
<div id="sources"></div>
<script>
const form = document.getElementById("form");
const answer = document.getElementById("answer");
const sources = document.getElementById("sources");
form.addEventListener("submit", async (event) => {
  event.preventDefault();
  answer.className = "";
  answer.textContent = "Thinking...";
  sources.textContent = "";
  try {
    const res = await fetch("/ask", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify({ question: document.getElementById("question").value }),
    });
    const body = await res.json();
    if (!res.ok) {
      answer.className = "error";
      answer.textContent = body.error;
      return;
    }
    answer.textContent = body.answer;
    const files = [...new Set(body.sources.map((s) => s.source))];
    if (files.length) sources.textContent = "Sources: " + files.join(", ");
  } catch (err) {
    answer.className = "error";
    answer.textContent = String(err);
  }
});
</script>
</body>
</html>
"#;
