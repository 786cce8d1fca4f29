//! Embedding generation for semantic search and retrieval.

mod local;

pub use local::{model_dimensions, FastEmbedder};

use crate::error::Result;
use async_trait::async_trait;

/// Trait for embedding generation.
///
/// The same embedder must be used for indexing chunks and for embedding
/// questions, so both land in the same vector space.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimensions.
    fn dimensions(&self) -> usize;
}
