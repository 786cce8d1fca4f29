//! Text segmentation for breaking documents into retrievable chunks.
//!
//! Chunks are bounded windows over a document's text. Consecutive chunks of
//! the same document share exactly `chunk_overlap` characters, and every chunk
//! is a verbatim substring of its parent.

mod recursive;

pub use recursive::{split_text, RecursiveChunker};

use crate::config::ChunkingSettings;
use crate::error::{FolioError, Result};
use crate::ingest::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A contiguous piece of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content of this chunk.
    pub text: String,
    /// File the chunk was cut from.
    pub source_id: String,
    /// Position of this chunk within its document.
    pub sequence_index: usize,
}

impl Chunk {
    pub fn new(text: impl Into<String>, source_id: impl Into<String>, sequence_index: usize) -> Self {
        Self {
            text: text.into(),
            source_id: source_id.into(),
            sequence_index,
        }
    }

    /// Stable identifier derived from the source and position.
    ///
    /// Indexing the same corpus twice yields the same ids, so upserts overwrite.
    pub fn stable_id(&self) -> String {
        let key = format!("{}:{}", self.source_id, self.sequence_index);
        Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).to_string()
    }
}

/// Size parameters for segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl ChunkingConfig {
    /// Create a validated config. Requires `0 <= chunk_overlap < chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(FolioError::Config(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(FolioError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn from_settings(settings: &ChunkingSettings) -> Result<Self> {
        Self::new(settings.chunk_size, settings.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Trait for segmentation implementations.
pub trait Chunker: Send + Sync {
    /// Split one document into chunks. Empty documents produce no chunks.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Segment each document independently, preserving document order.
pub fn chunk_documents(chunker: &dyn Chunker, documents: &[Document]) -> Vec<Chunk> {
    documents.iter().flat_map(|doc| chunker.chunk(doc)).collect()
}
