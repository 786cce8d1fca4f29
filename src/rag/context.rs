//! Context retrieval for RAG responses.

use super::RetrievedChunk;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::VectorIndex;
use std::sync::Arc;
use tracing::debug;

/// Embeds questions and looks up their nearest chunks in one namespace.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    namespace: String,
    top_k: usize,
}

impl Retriever {
    /// Create a new retriever returning 4 chunks per question.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            embedder,
            index,
            namespace: namespace.into(),
            top_k: 4,
        }
    }

    /// Set how many chunks are retrieved per question.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Retrieve the configured number of chunks for a query.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedChunk>> {
        self.retrieve_top(query, self.top_k).await
    }

    /// Retrieve up to `k` chunks, most similar first.
    ///
    /// Fewer than `k` stored vectors yields all of them; an empty namespace
    /// yields nothing.
    pub async fn retrieve_top(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        let query_embedding = self.embedder.embed(query).await?;

        let results = self
            .index
            .query(&query_embedding, k, &self.namespace)
            .await?;
        debug!("Retrieved {} of {} requested chunks", results.len(), k);

        Ok(results.into_iter().map(RetrievedChunk::from).collect())
    }
}

/// Join chunk texts with a blank line, in retrieval order.
pub fn format_context_for_prompt(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
