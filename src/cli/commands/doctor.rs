//! Doctor command - verify credentials, configuration and the remote index.

use crate::cli::{resolve_pdf_dir, Output};
use crate::config::{lookup_variable, mask, Credentials, Settings, REQUIRED_VARIABLES};
use crate::ingest::list_pdf_files;
use crate::vector_store::{check_metric, PineconeClient, VectorIndex, METRIC};
use console::style;
use std::path::{Path, PathBuf};

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Print a titled group of checks and add them to the running list.
fn report(title: &str, group: Vec<CheckResult>, checks: &mut Vec<CheckResult>) {
    println!("{}", style(title).bold());
    for check in &group {
        check.print();
    }
    println!();
    checks.extend(group);
}

/// Run all diagnostic checks.
pub async fn run_doctor(config_path: Option<PathBuf>, settings: &Settings) -> anyhow::Result<()> {
    Output::header("Folio Doctor");
    println!();
    println!("Checking credentials and configuration...\n");

    let mut checks = Vec::new();

    // Loads .env as a side effect, so the per-variable lookups below see it.
    let credentials = Credentials::from_env().ok();
    let credential_checks = REQUIRED_VARIABLES
        .iter()
        .map(|name| {
            let value = lookup_variable(|var| std::env::var(var).ok(), name);
            check_variable(name, value)
        })
        .collect();
    report("Credentials", credential_checks, &mut checks);

    let config_path = config_path.unwrap_or_else(Settings::default_config_path);
    report(
        "Configuration",
        vec![check_config_file(&config_path), check_settings(settings)],
        &mut checks,
    );

    let pdf_dir = resolve_pdf_dir(settings, None);
    report("Documents", vec![check_pdf_dir(&pdf_dir)], &mut checks);

    if let Some(credentials) = credentials {
        let group = check_remote_index(settings, &credentials).await;
        report("Vector index", group, &mut checks);
    }

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Folio.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Folio is ready to use.");
    }

    Ok(())
}

/// Check one required environment variable. API keys are masked.
fn check_variable(name: &str, value: Option<String>) -> CheckResult {
    let hint = format!("Set {} (or MY_{}) in the environment or in a .env file", name, name);
    match value {
        Some(value) if !value.trim().is_empty() => {
            let shown = if name.ends_with("_API_KEY") {
                mask(value.trim())
            } else {
                value.trim().to_string()
            };
            CheckResult::ok(name, &shown)
        }
        Some(_) => CheckResult::error(name, "empty", &hint),
        None => CheckResult::error(name, "not set", &hint),
    }
}

/// Check if config file exists.
fn check_config_file(path: &Path) -> CheckResult {
    if path.exists() {
        CheckResult::ok("Config file", &format!("{}", path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: folio config init",
        )
    }
}

fn check_settings(settings: &Settings) -> CheckResult {
    match settings.validate() {
        Ok(()) => CheckResult::ok(
            "Settings",
            &format!(
                "chunks of {} chars with {} overlap, top {} results",
                settings.chunking.chunk_size, settings.chunking.chunk_overlap, settings.rag.top_k
            ),
        ),
        Err(e) => CheckResult::error("Settings", &e.to_string(), "Fix the value in the config file"),
    }
}

fn check_pdf_dir(dir: &Path) -> CheckResult {
    match list_pdf_files(dir) {
        Ok(files) if files.is_empty() => CheckResult::warning(
            "PDF directory",
            &format!("{} (no PDF files)", dir.display()),
            "Add PDF files, or nothing will be indexed",
        ),
        Ok(files) => CheckResult::ok(
            "PDF directory",
            &format!("{} ({} PDF files)", dir.display(), files.len()),
        ),
        Err(_) => CheckResult::error(
            "PDF directory",
            &format!("{} not found", dir.display()),
            "Create it, set general.pdf_dir, or pass --pdf-dir",
        ),
    }
}

/// Look up the configured index without creating it.
async fn check_remote_index(settings: &Settings, credentials: &Credentials) -> Vec<CheckResult> {
    let name = credentials.index_name.as_str();
    let hint = "Check PINECONE_API_KEY and network access";

    let client = match PineconeClient::new(&credentials.pinecone_api_key, &settings.vector_store) {
        Ok(client) => client,
        Err(e) => return vec![CheckResult::error(name, &e.to_string(), hint)],
    };

    let description = match client.describe_index(name).await {
        Ok(Some(description)) => description,
        Ok(None) => {
            return vec![CheckResult::warning(
                name,
                "does not exist yet",
                &format!(
                    "It will be created on first run ({} dims, {}, {}/{})",
                    settings.embedding.dimensions,
                    METRIC,
                    credentials.cloud,
                    credentials.region
                ),
            )]
        }
        Err(e) => return vec![CheckResult::error(name, &e.to_string(), hint)],
    };

    let mut results = Vec::new();
    let dimension = description.dimension.unwrap_or(0);
    if dimension == settings.embedding.dimensions {
        results.push(CheckResult::ok(
            name,
            &format!("{} dims, {} metric", dimension, description.metric),
        ));
    } else {
        results.push(CheckResult::error(
            name,
            &format!(
                "dimension {} does not match the embedding model ({})",
                dimension, settings.embedding.dimensions
            ),
            "Use a different PINECONE_INDEX_NAME or recreate the index",
        ));
    }

    if let Err(e) = check_metric(&description) {
        results.push(CheckResult::error(
            "Metric",
            &e.to_string(),
            "Use a different PINECONE_INDEX_NAME; Folio creates cosine indexes",
        ));
        return results;
    }

    if !description.status.ready {
        results.push(CheckResult::warning(
            "Status",
            &description.status.state,
            "The index is still initializing",
        ));
        return results;
    }

    let namespace = settings.vector_store.namespace.as_str();
    match client.index(&description) {
        Ok(index) => match index.count(namespace).await {
            Ok(0) => results.push(CheckResult::warning(
                "Namespace",
                &format!("'{}' is empty", namespace),
                "Run: folio index",
            )),
            Ok(count) => results.push(CheckResult::ok(
                "Namespace",
                &format!("'{}' holds {} vectors", namespace, count),
            )),
            Err(e) => results.push(CheckResult::error("Namespace", &e.to_string(), hint)),
        },
        Err(e) => results.push(CheckResult::error("Namespace", &e.to_string(), hint)),
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_check_variable_masks_keys() {
        let key = check_variable("GEMINI_API_KEY", Some("AIzaSyExampleKey1234".to_string()));
        assert_eq!(key.status, CheckStatus::Ok);
        assert_eq!(key.message, "****1234");

        let region = check_variable("PINECONE_REGION", Some("us-east-1".to_string()));
        assert_eq!(region.message, "us-east-1");

        assert_eq!(check_variable("PINECONE_CLOUD", None).status, CheckStatus::Error);
        assert_eq!(
            check_variable("PINECONE_CLOUD", Some("  ".to_string())).message,
            "empty"
        );
    }

    #[test]
    fn test_check_pdf_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(check_pdf_dir(dir.path()).status, CheckStatus::Warning);

        std::fs::write(dir.path().join("a.pdf"), "x").unwrap();
        let result = check_pdf_dir(dir.path());
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.message.contains("1 PDF files"));

        assert_eq!(
            check_pdf_dir(&dir.path().join("missing")).status,
            CheckStatus::Error
        );
    }

    #[test]
    fn test_check_settings() {
        let mut settings = Settings::default();
        assert_eq!(check_settings(&settings).status, CheckStatus::Ok);
        settings.chunking.chunk_overlap = settings.chunking.chunk_size;
        assert_eq!(check_settings(&settings).status, CheckStatus::Error);
    }
}
