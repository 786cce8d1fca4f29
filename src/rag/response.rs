//! RAG response generation.

use super::{context::format_context_for_prompt, RetrievedChunk, Retriever};
use crate::config::Prompts;
use crate::error::{FolioError, Result};
use crate::llm::Generator;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// RAG engine for question answering.
///
/// Holds no per-question state, so one engine can serve concurrent questions.
#[derive(Clone)]
pub struct RagEngine {
    retriever: Retriever,
    generator: Arc<dyn Generator>,
    prompts: Prompts,
}

impl RagEngine {
    /// Create a new RAG engine with the default prompt.
    pub fn new(retriever: Retriever, generator: Arc<dyn Generator>) -> Self {
        Self {
            retriever,
            generator,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Answer one question from the indexed corpus.
    ///
    /// Makes one retrieval and exactly one generation request. An empty
    /// retrieval still produces a prompt; the model decides what to say.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn ask(&self, question: &str) -> Result<RagResponse> {
        if question.trim().is_empty() {
            return Err(FolioError::InvalidInput(
                "question must not be empty".to_string(),
            ));
        }
        info!("Processing question: {}", question);

        let sources = self.retriever.retrieve(question).await?;
        let prompt = build_prompt(&self.prompts, question, &sources);

        let answer = self.generator.generate(&prompt).await?;
        debug!(
            "Generated response with {} sources via {}",
            sources.len(),
            self.generator.model()
        );

        Ok(RagResponse { answer, sources })
    }
}

/// Render the answer prompt for `question` over `chunks`.
pub fn build_prompt(prompts: &Prompts, question: &str, chunks: &[RetrievedChunk]) -> String {
    let mut vars = HashMap::new();
    vars.insert("question".to_string(), question.to_string());
    vars.insert("context".to_string(), format_context_for_prompt(chunks));

    prompts.render_with_custom(&prompts.rag.template, &vars)
}

/// A RAG response with answer and sources.
#[derive(Debug, Clone, Serialize)]
pub struct RagResponse {
    /// The generated answer, verbatim.
    pub answer: String,
    /// Chunks the answer was grounded on, in retrieval order.
    pub sources: Vec<RetrievedChunk>,
}

impl RagResponse {
    /// Distinct source files, in first-seen order.
    pub fn source_files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = Vec::new();
        for source in &self.sources {
            if !files.contains(&source.source.as_str()) {
                files.push(&source.source);
            }
        }
        files
    }
}
