//! In-process collaborators for exercising the pipeline without network access.

use crate::embedding::Embedder;
use crate::error::{FolioError, Result};
use crate::llm::Generator;
use crate::vector_store::{
    check_dimensions, cosine_similarity, rank_results, IndexedVector, SearchResult, VectorIndex,
};
use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

/// Bag-of-words embedder: each lowercase word is hashed into a bucket.
///
/// Texts sharing words land close together, which is enough for ranking tests.
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let mut values = vec![0.0f32; self.dimensions];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            values[(hasher.finish() % self.dimensions as u64) as usize] += 1.0;
        }
        let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            values.iter_mut().for_each(|v| *v /= norm);
        }
        values
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Namespaced index held in memory, ranked by cosine similarity.
pub struct MemoryIndex {
    dimension: usize,
    namespaces: RwLock<HashMap<String, BTreeMap<String, IndexedVector>>>,
}

impl MemoryIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            namespaces: RwLock::new(HashMap::new()),
        }
    }

    fn lock_error() -> FolioError {
        FolioError::VectorStore("memory index lock poisoned".to_string())
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    fn name(&self) -> &str {
        "memory"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn upsert(&self, vectors: &[IndexedVector], namespace: &str) -> Result<usize> {
        check_dimensions(self.name(), self.dimension, vectors)?;
        let mut namespaces = self.namespaces.write().map_err(|_| Self::lock_error())?;
        let records = namespaces.entry(namespace.to_string()).or_default();
        for vector in vectors {
            records.insert(vector.id.clone(), vector.clone());
        }
        Ok(vectors.len())
    }

    async fn query(
        &self,
        embedding: &[f32],
        top_k: usize,
        namespace: &str,
    ) -> Result<Vec<SearchResult>> {
        let namespaces = self.namespaces.read().map_err(|_| Self::lock_error())?;
        let mut results: Vec<SearchResult> = namespaces
            .get(namespace)
            .map(|records| {
                records
                    .values()
                    .map(|v| SearchResult {
                        id: v.id.clone(),
                        score: cosine_similarity(embedding, &v.values),
                        text: v.text.clone(),
                        source_id: v.source_id.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        rank_results(&mut results);
        results.truncate(top_k);
        Ok(results)
    }

    async fn count(&self, namespace: &str) -> Result<usize> {
        let namespaces = self.namespaces.read().map_err(|_| Self::lock_error())?;
        Ok(namespaces.get(namespace).map(|r| r.len()).unwrap_or(0))
    }

    async fn clear(&self, namespace: &str) -> Result<()> {
        let mut namespaces = self.namespaces.write().map_err(|_| Self::lock_error())?;
        namespaces.remove(namespace);
        Ok(())
    }
}

/// Generator that records prompts and answers from a fixed script.
pub struct ScriptedGenerator {
    answer: String,
    fail: AtomicBool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            fail: AtomicBool::new(false),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Make subsequent calls fail (or succeed again).
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(FolioError::Generation("service unavailable".to_string()));
        }
        Ok(self.answer.clone())
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Write a minimal PDF with one page per entry of `pages`.
///
/// An empty entry becomes a page with no content stream.
pub fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => resources_id,
        };
        if !text.is_empty() {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            page.set("Contents", content_id);
        }
        kids.push(doc.add_object(page).into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}
