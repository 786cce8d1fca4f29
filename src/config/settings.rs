//! Configuration settings for Folio.

use crate::error::{FolioError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub chunking: ChunkingSettings,
    pub embedding: EmbeddingSettings,
    pub vector_store: VectorStoreSettings,
    pub rag: RagSettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory scanned (non-recursively) for PDF files.
    pub pdf_dir: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            pdf_dir: "pdf".to_string(),
        }
    }
}

/// Text segmentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Maximum characters per chunk.
    pub chunk_size: usize,
    /// Characters shared by consecutive chunks of the same document.
    pub chunk_overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Sentence-embedding model name.
    pub model: String,
    /// Embedding dimensions produced by the model.
    pub dimensions: usize,
    /// Texts embedded per inference batch.
    pub batch_size: usize,
    /// Where model weights are cached (defaults to the fastembed cache).
    pub cache_dir: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "all-MiniLM-L6-v2".to_string(),
            dimensions: 384,
            batch_size: 32,
            cache_dir: None,
        }
    }
}

/// Remote vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Namespace holding this corpus.
    pub namespace: String,
    /// Vectors sent per upsert request.
    pub upsert_batch_size: usize,
    /// Pinecone control plane URL.
    pub control_plane_url: String,
    /// Value of the `X-Pinecone-API-Version` header.
    pub api_version: String,
    /// How long to wait for a freshly created index to become ready.
    pub ready_timeout_secs: u64,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            upsert_batch_size: 100,
            control_plane_url: "https://api.pinecone.io".to_string(),
            api_version: "2024-07".to_string(),
            ready_timeout_secs: 120,
        }
    }
}

/// RAG (Retrieval-Augmented Generation) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// Generative model used for answers.
    pub model: String,
    /// Base URL of the OpenAI-compatible generation endpoint.
    pub api_base: String,
    /// Number of chunks retrieved per question.
    pub top_k: usize,
    /// Request timeout for the generation endpoint.
    pub timeout_secs: u64,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            model: "gemma-3-1b-it".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            top_k: 4,
            timeout_secs: 300,
        }
    }
}

/// Web interface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7860,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| FolioError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that the numeric settings are mutually consistent.
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(FolioError::Config(
                "chunking.chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(FolioError::Config(format!(
                "chunking.chunk_overlap ({}) must be less than chunking.chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.rag.top_k == 0 {
            return Err(FolioError::Config(
                "rag.top_k must be greater than zero".to_string(),
            ));
        }
        if self.embedding.dimensions == 0 {
            return Err(FolioError::Config(
                "embedding.dimensions must be greater than zero".to_string(),
            ));
        }
        let model_dimensions = crate::embedding::model_dimensions(&self.embedding.model)?;
        if model_dimensions != self.embedding.dimensions {
            return Err(FolioError::Config(format!(
                "embedding.dimensions ({}) does not match model {} ({})",
                self.embedding.dimensions, self.embedding.model, model_dimensions
            )));
        }
        if self.embedding.batch_size == 0 || self.vector_store.upsert_batch_size == 0 {
            return Err(FolioError::Config(
                "batch sizes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("folio")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded PDF directory path.
    pub fn pdf_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.pdf_dir)
    }

    /// Get the expanded embedding cache directory, if configured.
    pub fn embedding_cache_dir(&self) -> Option<PathBuf> {
        self.embedding.cache_dir.as_deref().map(Self::expand_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.chunking.chunk_size, 1000);
        assert_eq!(settings.chunking.chunk_overlap, 200);
        assert_eq!(settings.embedding.dimensions, 384);
        assert_eq!(settings.rag.top_k, 4);
        assert_eq!(settings.vector_store.namespace, "default");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [chunking]
            chunk_size = 500

            [rag]
            top_k = 8
            "#,
        )
        .unwrap();

        assert_eq!(settings.chunking.chunk_size, 500);
        assert_eq!(settings.chunking.chunk_overlap, 200);
        assert_eq!(settings.rag.top_k, 8);
        assert_eq!(settings.rag.model, "gemma-3-1b-it");
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        let mut settings = Settings::default();
        settings.chunking.chunk_overlap = 1000;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("chunk_overlap"));
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut settings = Settings::default();
        settings.rag.top_k = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.general.pdf_dir = "/srv/papers".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.general.pdf_dir, "/srv/papers");
        assert_eq!(loaded.server.port, 7860);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.general.pdf_dir, "pdf");
    }

    #[test]
    fn test_dimensions_must_match_model() {
        let mut settings = Settings::default();
        settings.embedding.dimensions = 512;
        assert!(settings.validate().is_err());

        settings.embedding.model = "no-such-model".to_string();
        assert!(settings.validate().is_err());
    }
}
