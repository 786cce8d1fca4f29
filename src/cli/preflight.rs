//! Pre-flight checks before expensive operations.
//!
//! Validates that credentials and the PDF directory are available before
//! loading the embedding model or touching any remote service.

use crate::config::Credentials;
use crate::error::{FolioError, Result};
use std::path::Path;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation<'a> {
    /// Indexing needs credentials and a readable PDF directory.
    Index(&'a Path),
    /// Querying an existing namespace only needs credentials.
    Query,
}

/// Run pre-flight checks for the given operation.
///
/// Returns the loaded credentials if all checks pass, or an error describing
/// what's missing.
pub fn check(operation: Operation<'_>) -> Result<Credentials> {
    let credentials = Credentials::from_env()?;
    if let Operation::Index(dir) = operation {
        check_pdf_dir(dir)?;
    }
    Ok(credentials)
}

/// Check that the PDF directory exists.
fn check_pdf_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(FolioError::Config(format!(
            "PDF directory {} does not exist. Create it or pass --pdf-dir.",
            dir.display()
        )))
    }
}
