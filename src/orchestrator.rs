//! Pipeline orchestrator for Folio.
//!
//! Builds the collaborators once at startup, indexes the PDF corpus, then
//! hands out the retrieval and answering components used per question.

use crate::chunking::{chunk_documents, Chunk, ChunkingConfig, RecursiveChunker};
use crate::config::{Credentials, Prompts, Settings};
use crate::embedding::{Embedder, FastEmbedder};
use crate::error::{FolioError, Result};
use crate::ingest::{load_documents, Document, SkippedFile};
use crate::llm::{GeminiGenerator, Generator};
use crate::rag::{RagEngine, Retriever};
use crate::vector_store::{IndexedVector, PineconeClient, VectorIndex};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The main orchestrator for the Folio pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    generator: Arc<dyn Generator>,
}

impl Orchestrator {
    /// Connect to the real services: local embedding model, Pinecone and Gemini.
    ///
    /// The index is created with the model's dimension if it does not exist yet.
    pub async fn connect(settings: Settings, credentials: &Credentials) -> Result<Self> {
        // Load prompts (with optional custom directory and variables)
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let embedder =
            FastEmbedder::load(&settings.embedding, settings.embedding_cache_dir()).await?;

        let client = PineconeClient::new(&credentials.pinecone_api_key, &settings.vector_store)?;
        let description = client
            .ensure_index(
                &credentials.index_name,
                embedder.dimensions(),
                &credentials.cloud,
                &credentials.region,
            )
            .await?;
        info!(
            "Connected to index '{}' ({} dims)",
            description.name,
            description.dimension.unwrap_or(0)
        );
        let index = client.index(&description)?;

        let generator = GeminiGenerator::new(&credentials.gemini_api_key, &settings.rag)?;

        Ok(Self::with_components(
            settings,
            prompts,
            Arc::new(embedder),
            Arc::new(index),
            Arc::new(generator),
        ))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            settings,
            prompts,
            embedder,
            index,
            generator,
        }
    }

    /// Get a reference to the vector index.
    pub fn index(&self) -> Arc<dyn VectorIndex> {
        self.index.clone()
    }

    /// Namespace holding this corpus.
    pub fn namespace(&self) -> &str {
        &self.settings.vector_store.namespace
    }

    /// Fail if the index cannot hold this embedder's vectors.
    pub fn check_dimensions(&self) -> Result<()> {
        let index_dimension = self.index.dimension();
        let embedding_dimension = self.embedder.dimensions();
        if index_dimension != embedding_dimension {
            return Err(FolioError::DimensionMismatch {
                index: self.index.name().to_string(),
                index_dimension,
                embedding_dimension,
            });
        }
        Ok(())
    }

    /// Startup pipeline: ingest `pdf_dir`, segment, embed and upsert.
    ///
    /// The dimension check runs first, so a mismatched index fails before any
    /// file is read. With `reset`, the namespace is emptied before indexing.
    #[instrument(skip(self), fields(pdf_dir = %pdf_dir.display()))]
    pub async fn bootstrap(&self, pdf_dir: &Path, reset: bool) -> Result<IndexReport> {
        self.check_dimensions()?;

        if reset {
            info!("Clearing namespace '{}'", self.namespace());
            self.index.clear(self.namespace()).await?;
        }

        let dir = pdf_dir.to_path_buf();
        let ingested = tokio::task::spawn_blocking(move || load_documents(&dir))
            .await
            .map_err(|e| FolioError::Rag(format!("Ingestion task failed: {}", e)))??;

        if ingested.documents.is_empty() {
            warn!("No readable PDF files in {:?}", pdf_dir);
        }

        let chunks = self.chunk(&ingested.documents)?;
        let vectors_upserted = self.index_chunks(&chunks).await?;

        let report = IndexReport {
            documents: ingested.documents.len(),
            skipped: ingested.skipped,
            chunks: chunks.len(),
            vectors_upserted,
        };
        info!(
            "Indexed {} documents into {} chunks ({} skipped)",
            report.documents,
            report.chunks,
            report.skipped.len()
        );
        Ok(report)
    }

    /// Segment and index already-loaded documents. Returns the vectors written.
    pub async fn index_documents(&self, documents: &[Document]) -> Result<usize> {
        let chunks = self.chunk(documents)?;
        self.index_chunks(&chunks).await
    }

    fn chunk(&self, documents: &[Document]) -> Result<Vec<Chunk>> {
        let config = ChunkingConfig::from_settings(&self.settings.chunking)?;
        let chunker = RecursiveChunker::new(config);
        let chunks = chunk_documents(&chunker, documents);
        debug!("Created {} chunks from {} documents", chunks.len(), documents.len());
        Ok(chunks)
    }

    /// Generate embeddings and upsert chunks in batches.
    pub async fn index_chunks(&self, chunks: &[Chunk]) -> Result<usize> {
        self.check_dimensions()?;
        if chunks.is_empty() {
            return Ok(0);
        }

        let batch_size = self.settings.vector_store.upsert_batch_size.max(1);
        let mut upserted = 0;

        for batch in chunks.chunks(batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;
            if embeddings.len() != batch.len() {
                return Err(FolioError::Embedding(format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    embeddings.len()
                )));
            }

            let vectors: Vec<IndexedVector> = batch
                .iter()
                .zip(embeddings)
                .map(|(chunk, values)| IndexedVector::from_chunk(chunk, values))
                .collect();

            upserted += self.index.upsert(&vectors, self.namespace()).await?;
            debug!("Upserted {}/{} chunks", upserted, chunks.len());
        }

        Ok(upserted)
    }

    /// Retriever over this corpus with the configured `top_k`.
    pub fn retriever(&self) -> Retriever {
        Retriever::new(self.embedder.clone(), self.index.clone(), self.namespace())
            .with_top_k(self.settings.rag.top_k)
    }

    /// Question-answering engine over this corpus.
    pub fn rag_engine(&self) -> RagEngine {
        RagEngine::new(self.retriever(), self.generator.clone()).with_prompts(self.prompts.clone())
    }
}

/// Result of the startup indexing pass.
#[derive(Debug)]
pub struct IndexReport {
    /// Documents ingested.
    pub documents: usize,
    /// Files that could not be read.
    pub skipped: Vec<SkippedFile>,
    /// Chunks produced by segmentation.
    pub chunks: usize,
    /// Vectors written to the index.
    pub vectors_upserted: usize,
}
