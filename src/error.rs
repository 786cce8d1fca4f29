//! Error types for Folio.

use std::path::PathBuf;
use thiserror::Error;

/// Library-level error type for Folio operations.
#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required settings: {}. Set them in the environment or a .env file.", .0.join(", "))]
    MissingCredentials(Vec<String>),

    #[error("Failed to ingest {path}: {message}")]
    Ingestion { path: PathBuf, message: String },

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error(
        "Dimension mismatch: index '{index}' has dimension {index_dimension} \
         but the embedding model produces {embedding_dimension}"
    )]
    DimensionMismatch {
        index: String,
        index_dimension: usize,
        embedding_dimension: usize,
    },

    #[error("Answer generation failed: {0}")]
    Generation(String),

    #[error("RAG error: {0}")]
    Rag(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for Folio operations.
pub type Result<T> = std::result::Result<T, FolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_lists_every_name() {
        let err = FolioError::MissingCredentials(vec![
            "PINECONE_API_KEY".to_string(),
            "GEMINI_API_KEY".to_string(),
        ]);
        let message = err.to_string();
        assert!(message.contains("PINECONE_API_KEY, GEMINI_API_KEY"));
    }

    #[test]
    fn test_dimension_mismatch_is_labeled() {
        let err = FolioError::DimensionMismatch {
            index: "docs".to_string(),
            index_dimension: 512,
            embedding_dimension: 384,
        };
        let message = err.to_string();
        assert!(message.starts_with("Dimension mismatch"));
        assert!(message.contains("512"));
        assert!(message.contains("384"));
    }
}
