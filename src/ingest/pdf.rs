//! PDF text extraction.

use crate::error::{FolioError, Result};
use std::path::Path;
use tracing::debug;

/// Extract the text of every page of a PDF, concatenated in page order.
///
/// A page without extractable text contributes an empty string. A file that
/// cannot be parsed as a PDF at all is an error.
pub fn extract_pdf_text(path: &Path) -> Result<String> {
    let document = lopdf::Document::load(path)?;

    if document.is_encrypted() {
        return Err(FolioError::Ingestion {
            path: path.to_path_buf(),
            message: "document is encrypted".to_string(),
        });
    }

    let mut text = String::new();
    for page_number in document.get_pages().keys() {
        match document.extract_text(&[*page_number]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => debug!("No extractable text on page {} of {:?}: {}", page_number, path, e),
        }
    }

    Ok(text)
}
