//! Index command implementation.

use crate::cli::{Output, StartupArgs};
use crate::config::Settings;
use anyhow::Result;

/// Ingest and index the PDF directory, then report the namespace size.
pub async fn run_index(pdf_dir: Option<String>, reset: bool, settings: Settings) -> Result<()> {
    let startup = StartupArgs {
        pdf_dir,
        reset,
        skip_index: false,
    };
    let orchestrator = crate::cli::start(settings, &startup).await?;

    let count = orchestrator.index().count(orchestrator.namespace()).await?;
    Output::kv(
        &format!("Namespace '{}'", orchestrator.namespace()),
        &format!("{} vectors", count),
    );

    Ok(())
}
