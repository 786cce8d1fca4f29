//! Search command implementation.

use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the search command against the already-indexed namespace.
pub async fn run_search(query: &str, top_k: Option<usize>, settings: Settings) -> Result<()> {
    let credentials = crate::cli::credentials_for(Operation::Query)?;
    let top_k = top_k.unwrap_or(settings.rag.top_k);

    let orchestrator = crate::cli::connect(settings, &credentials).await?;
    orchestrator.check_dimensions()?;

    let spinner = Output::spinner("Searching...");
    let results = orchestrator.retriever().retrieve_top(query, top_k).await;
    spinner.finish_and_clear();

    match results {
        Ok(chunks) => {
            if chunks.is_empty() {
                Output::warning("No results found. Has the corpus been indexed?");
            } else {
                Output::success(&format!("Found {} results", chunks.len()));

                for (i, chunk) in chunks.iter().enumerate() {
                    Output::search_result(i + 1, &chunk.source, chunk.score, &chunk.text);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
