//! Local sentence embeddings via fastembed (ONNX runtime, CPU).

use super::Embedder;
use crate::config::EmbeddingSettings;
use crate::error::{FolioError, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Resolve a model name to the fastembed model and its output dimensions.
fn resolve_model(name: &str) -> Result<(EmbeddingModel, usize)> {
    match name.to_lowercase().as_str() {
        "all-minilm-l6-v2" | "sentence-transformers/all-minilm-l6-v2" => {
            Ok((EmbeddingModel::AllMiniLML6V2, 384))
        }
        "all-minilm-l12-v2" | "sentence-transformers/all-minilm-l12-v2" => {
            Ok((EmbeddingModel::AllMiniLML12V2, 384))
        }
        "bge-small-en-v1.5" | "baai/bge-small-en-v1.5" => Ok((EmbeddingModel::BGESmallENV15, 384)),
        _ => Err(FolioError::Config(format!(
            "Unsupported embedding model: {}",
            name
        ))),
    }
}

/// Output dimensions of a supported model.
pub fn model_dimensions(name: &str) -> Result<usize> {
    resolve_model(name).map(|(_, dims)| dims)
}

/// Embedder running a sentence-transformer model locally.
pub struct FastEmbedder {
    model: Arc<TextEmbedding>,
    model_name: String,
    dimensions: usize,
    batch_size: usize,
}

impl FastEmbedder {
    /// Load a model, downloading weights into the cache on first use.
    ///
    /// This blocks; call it from a blocking context or use [`FastEmbedder::load`].
    pub fn with_config(
        model_name: &str,
        batch_size: usize,
        cache_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let (model, dimensions) = resolve_model(model_name)?;

        let mut options = InitOptions::new(model).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        let model = TextEmbedding::try_new(options).map_err(|e| {
            FolioError::Embedding(format!("Failed to load model {}: {}", model_name, e))
        })?;

        info!("Loaded embedding model {} ({} dimensions)", model_name, dimensions);

        Ok(Self {
            model: Arc::new(model),
            model_name: model_name.to_string(),
            dimensions,
            batch_size: batch_size.max(1),
        })
    }

    /// Load the configured model on a blocking thread.
    pub async fn load(settings: &EmbeddingSettings, cache_dir: Option<PathBuf>) -> Result<Self> {
        let model_name = settings.model.clone();
        let batch_size = settings.batch_size;

        tokio::task::spawn_blocking(move || Self::with_config(&model_name, batch_size, cache_dir))
            .await
            .map_err(|e| FolioError::Embedding(format!("Model loading task failed: {}", e)))?
    }
}

#[async_trait]
impl Embedder for FastEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| FolioError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let model = Arc::clone(&self.model);
        let input = texts.to_vec();
        let batch_size = self.batch_size;

        let embeddings = tokio::task::spawn_blocking(move || model.embed(input, Some(batch_size)))
            .await
            .map_err(|e| FolioError::Embedding(format!("Embedding task failed: {}", e)))?
            .map_err(|e| FolioError::Embedding(e.to_string()))?;

        if embeddings.len() != texts.len() {
            return Err(FolioError::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        if let Some(bad) = embeddings.iter().find(|e| e.len() != self.dimensions) {
            return Err(FolioError::Embedding(format!(
                "Model {} returned a {}-dimensional vector, expected {}",
                self.model_name,
                bad.len(),
                self.dimensions
            )));
        }

        debug!("Generated {} embeddings", embeddings.len());
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
