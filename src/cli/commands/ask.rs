//! Ask command implementation.

use crate::cli::{Output, StartupArgs};
use crate::config::Settings;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(question: &str, startup: &StartupArgs, settings: Settings) -> Result<()> {
    let orchestrator = crate::cli::start(settings, startup).await?;
    let engine = orchestrator.rag_engine();

    let spinner = Output::spinner("Searching documents...");

    match engine.ask(question).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.answer);

            let files = response.source_files();
            if !files.is_empty() {
                Output::header("Sources");
                for file in files {
                    Output::list_item(file);
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
