//! Vector index abstraction for Folio.
//!
//! The index itself is a remote service; this module defines the records
//! exchanged with it and the trait the pipeline talks to.

mod pinecone;

pub use pinecone::{check_metric, IndexDescription, IndexStatus, PineconeClient, PineconeIndex, METRIC};

use crate::chunking::Chunk;
use crate::error::{FolioError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Metadata key holding the chunk text.
pub const TEXT_KEY: &str = "text";
/// Metadata key holding the source file name.
pub const SOURCE_KEY: &str = "source";
/// Metadata key holding the chunk's position in its document.
pub const SEQUENCE_KEY: &str = "chunk";

/// A chunk embedding as persisted in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedVector {
    /// Stable record id.
    pub id: String,
    /// Embedding values.
    pub values: Vec<f32>,
    /// Chunk text, stored as retrievable payload.
    pub text: String,
    /// Originating file name.
    pub source_id: String,
    /// Position of the chunk within its document.
    pub sequence_index: usize,
}

impl IndexedVector {
    /// Pair a chunk with its embedding.
    pub fn from_chunk(chunk: &Chunk, values: Vec<f32>) -> Self {
        Self {
            id: chunk.stable_id(),
            values,
            text: chunk.text.clone(),
            source_id: chunk.source_id.clone(),
            sequence_index: chunk.sequence_index,
        }
    }

    /// Payload stored next to the vector.
    pub fn metadata(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut metadata = serde_json::Map::new();
        metadata.insert(TEXT_KEY.to_string(), self.text.clone().into());
        metadata.insert(SOURCE_KEY.to_string(), self.source_id.clone().into());
        metadata.insert(SEQUENCE_KEY.to_string(), self.sequence_index.into());
        metadata
    }
}

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: String,
    /// Similarity score (higher is better).
    pub score: f32,
    pub text: String,
    pub source_id: String,
}

/// Trait for remote vector index implementations.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Index name, for diagnostics.
    fn name(&self) -> &str;

    /// Dimension every stored vector must have.
    fn dimension(&self) -> usize;

    /// Insert or overwrite vectors by id. Returns the number written.
    async fn upsert(&self, vectors: &[IndexedVector], namespace: &str) -> Result<usize>;

    /// Return up to `top_k` nearest records, best first.
    async fn query(
        &self,
        embedding: &[f32],
        top_k: usize,
        namespace: &str,
    ) -> Result<Vec<SearchResult>>;

    /// Number of vectors stored in the namespace.
    async fn count(&self, namespace: &str) -> Result<usize>;

    /// Remove every vector in the namespace.
    async fn clear(&self, namespace: &str) -> Result<()>;
}

/// Fail unless every vector has exactly `dimension` values.
pub fn check_dimensions(index: &str, dimension: usize, vectors: &[IndexedVector]) -> Result<()> {
    match vectors.iter().find(|v| v.values.len() != dimension) {
        Some(bad) => Err(FolioError::DimensionMismatch {
            index: index.to_string(),
            index_dimension: dimension,
            embedding_dimension: bad.values.len(),
        }),
        None => Ok(()),
    }
}

/// Order results by descending score; equal scores fall back to ascending id.
pub fn rank_results(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, score: f32) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            score,
            text: String::new(),
            source_id: String::new(),
        }
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_rank_results_breaks_ties_by_id() {
        let mut results = vec![result("b", 0.5), result("c", 0.9), result("a", 0.5)];
        rank_results(&mut results);
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_from_chunk_carries_metadata() {
        let chunk = Chunk::new("Paris is the capital.", "france.pdf", 3);
        let vector = IndexedVector::from_chunk(&chunk, vec![0.1, 0.2]);

        assert_eq!(vector.id, chunk.stable_id());
        let metadata = vector.metadata();
        assert_eq!(metadata[TEXT_KEY], "Paris is the capital.");
        assert_eq!(metadata[SOURCE_KEY], "france.pdf");
        assert_eq!(metadata[SEQUENCE_KEY], 3);
    }

    #[test]
    fn test_check_dimensions() {
        let chunk = Chunk::new("x", "a.pdf", 0);
        let ok = IndexedVector::from_chunk(&chunk, vec![0.0; 4]);
        let bad = IndexedVector::from_chunk(&chunk, vec![0.0; 3]);

        assert!(check_dimensions("idx", 4, &[ok.clone()]).is_ok());
        let err = check_dimensions("idx", 4, &[ok, bad]).unwrap_err();
        match err {
            FolioError::DimensionMismatch {
                index_dimension,
                embedding_dimension,
                ..
            } => {
                assert_eq!(index_dimension, 4);
                assert_eq!(embedding_dimension, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
