//! Startup sequence shared by the interactive commands.

use super::preflight::{self, Operation};
use super::{Output, StartupArgs};
use crate::config::{Credentials, Settings};
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::path::PathBuf;

/// Check requirements, connect, and index the corpus (unless skipped).
///
/// Any failure here is fatal: nothing interactive starts on a half-built index.
pub async fn start(settings: Settings, args: &StartupArgs) -> Result<Orchestrator> {
    let pdf_dir = resolve_pdf_dir(&settings, args.pdf_dir.as_deref());
    let operation = if args.skip_index {
        Operation::Query
    } else {
        Operation::Index(&pdf_dir)
    };
    let credentials = credentials_for(operation)?;

    let orchestrator = connect(settings, &credentials).await?;

    if args.skip_index {
        orchestrator.check_dimensions()?;
        let count = orchestrator.index().count(orchestrator.namespace()).await?;
        Output::info(&format!(
            "Using {} vectors already in namespace '{}'",
            count,
            orchestrator.namespace()
        ));
    } else {
        let spinner = Output::spinner(&format!("Indexing PDFs in {}...", pdf_dir.display()));
        let result = orchestrator.bootstrap(&pdf_dir, args.reset).await;
        spinner.finish_and_clear();
        Output::index_report(&result?);
    }

    Ok(orchestrator)
}

/// Run pre-flight checks, pointing at `doctor` when they fail.
pub fn credentials_for(operation: Operation<'_>) -> Result<Credentials> {
    match preflight::check(operation) {
        Ok(credentials) => Ok(credentials),
        Err(e) => {
            Output::error(&e.to_string());
            Output::info("Run 'folio doctor' for detailed diagnostics.");
            Err(e.into())
        }
    }
}

/// Load the embedding model and open the index behind a spinner.
pub async fn connect(settings: Settings, credentials: &Credentials) -> Result<Orchestrator> {
    let spinner = Output::spinner("Loading embedding model and connecting to the index...");
    let result = Orchestrator::connect(settings, credentials).await;
    spinner.finish_and_clear();
    Ok(result?)
}

/// The `--pdf-dir` override, or the configured directory.
pub fn resolve_pdf_dir(settings: &Settings, override_dir: Option<&str>) -> PathBuf {
    override_dir
        .map(Settings::expand_path)
        .unwrap_or_else(|| settings.pdf_dir())
}
