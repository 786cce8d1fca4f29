//! Document ingestion from a directory of PDF files.
//!
//! The directory is scanned non-recursively. Files that cannot be parsed are
//! skipped with a warning and reported in [`IngestReport::skipped`]; they never
//! abort ingestion of the rest of the corpus.

mod pdf;

pub use pdf::extract_pdf_text;

use crate::error::{FolioError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Recognized PDF file extensions (compared case-insensitively).
const PDF_EXTENSIONS: &[&str] = &["pdf"];

/// One ingested source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Extracted text, pages concatenated in page order.
    pub content: String,
    /// Originating file name.
    pub source_id: String,
}

impl Document {
    pub fn new(content: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source_id: source_id.into(),
        }
    }
}

/// A file that was found but could not be ingested.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of scanning a directory.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub documents: Vec<Document>,
    pub skipped: Vec<SkippedFile>,
}

/// Check if path has a PDF extension.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| PDF_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// List the PDF files directly inside `dir`, in filesystem listing order.
pub fn list_pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(FolioError::Ingestion {
            path: dir.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_pdf(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

/// Load every PDF in `dir` as a [`Document`].
///
/// Output order follows the filesystem listing and is not guaranteed to be stable.
pub fn load_documents(dir: &Path) -> Result<IngestReport> {
    let files = list_pdf_files(dir)?;
    info!("Found {} PDF files in {:?}", files.len(), dir);

    let mut report = IngestReport::default();

    for path in files {
        let source_id = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match extract_pdf_text(&path) {
            Ok(content) => {
                debug!("Extracted {} characters from {}", content.chars().count(), source_id);
                report.documents.push(Document::new(content, source_id));
            }
            Err(e) => {
                warn!("Skipping unreadable PDF {:?}: {}", path, e);
                report.skipped.push(SkippedFile {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}
