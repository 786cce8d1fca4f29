//! RAG (Retrieval-Augmented Generation) for question answering over PDFs.
//!
//! A [`Retriever`] turns a question into the nearest chunks of the corpus; a
//! [`RagEngine`] feeds those chunks and the question to a generator.

pub mod context;
mod response;

pub use context::{format_context_for_prompt, Retriever};
pub use response::{build_prompt, RagEngine, RagResponse};

use crate::vector_store::SearchResult;
use serde::Serialize;

/// A retrieved chunk, ready to be placed in a prompt or shown as a source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedChunk {
    /// Chunk text.
    pub text: String,
    /// File the chunk came from.
    pub source: String,
    /// Similarity score.
    pub score: f32,
}

impl From<SearchResult> for RetrievedChunk {
    fn from(result: SearchResult) -> Self {
        Self {
            text: result.text,
            source: result.source_id,
            score: result.score,
        }
    }
}
