//! Folio - question answering over a folder of PDFs
//!
//! Folio reads the PDFs in a directory, splits their text into overlapping
//! chunks, embeds each chunk with a local sentence-embedding model and stores
//! the vectors in a Pinecone index. Questions are embedded the same way, the
//! nearest chunks are retrieved, and a Gemini model answers from them.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Settings, credentials and prompt templates
//! - `ingest` - PDF discovery and text extraction
//! - `chunking` - Boundary-aware overlapping segmentation
//! - `embedding` - Embedding generation
//! - `vector_store` - Remote vector index abstraction (Pinecone)
//! - `llm` - Text generation backends (Gemini)
//! - `rag` - Retrieval and answer synthesis
//! - `orchestrator` - Startup indexing and component wiring
//!
//! # Example
//!
//! ```rust,no_run
//! use folio::config::{Credentials, Settings};
//! use folio::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let credentials = Credentials::from_env()?;
//!     let pdf_dir = settings.pdf_dir();
//!
//!     let orchestrator = Orchestrator::connect(settings, &credentials).await?;
//!     let report = orchestrator.bootstrap(&pdf_dir, false).await?;
//!     println!("Indexed {} chunks", report.chunks);
//!
//!     let response = orchestrator.rag_engine().ask("Who is the author?").await?;
//!     println!("{}", response.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod vector_store;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{FolioError, Result};
