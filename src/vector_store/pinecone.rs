//! Pinecone serverless index over its REST API.
//!
//! The control plane (`api.pinecone.io`) lists, creates and describes indexes.
//! Each index has its own data-plane host that serves upsert, query, stats and
//! delete for namespaced vectors.

use super::{check_dimensions, rank_results, IndexedVector, SearchResult, VectorIndex};
use super::{SOURCE_KEY, TEXT_KEY};
use crate::config::VectorStoreSettings;
use crate::error::{FolioError, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use url::Url;

const API_KEY_HEADER: &str = "Api-Key";
const API_VERSION_HEADER: &str = "X-Pinecone-API-Version";

/// Per-request timeout for control and data plane calls.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Similarity metric of every index Folio creates or accepts. Scores are
/// ranked highest first, which only holds for similarity metrics.
pub const METRIC: &str = "cosine";

/// Delay between readiness polls after creating an index.
const READY_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Index metadata as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDescription {
    pub name: String,
    /// Absent for sparse indexes.
    #[serde(default)]
    pub dimension: Option<usize>,
    #[serde(default)]
    pub metric: String,
    /// Data-plane host, usually without a scheme.
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub status: IndexStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStatus {
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub state: String,
}

// ── Control plane request/response types ───────────────────────────

#[derive(Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexDescription>,
}

#[derive(Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: &'a str,
    spec: IndexSpec<'a>,
}

#[derive(Serialize)]
struct IndexSpec<'a> {
    serverless: ServerlessSpec<'a>,
}

#[derive(Serialize)]
struct ServerlessSpec<'a> {
    cloud: &'a str,
    region: &'a str,
}

// ── Data plane request/response types ──────────────────────────────

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<VectorRecord<'a>>,
    namespace: &'a str,
}

#[derive(Serialize)]
struct VectorRecord<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    namespace: &'a str,
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Deserialize)]
struct IndexStats {
    #[serde(default)]
    namespaces: HashMap<String, NamespaceStats>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NamespaceStats {
    #[serde(default)]
    vector_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest<'a> {
    delete_all: bool,
    namespace: &'a str,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl QueryMatch {
    fn into_result(self) -> SearchResult {
        let metadata = self.metadata.unwrap_or_default();
        let field = |key: &str| {
            metadata
                .get(key)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        let text = field(TEXT_KEY);
        if text.is_empty() {
            warn!("Match {} has no stored text", self.id);
        }
        SearchResult {
            source_id: field(SOURCE_KEY),
            text,
            id: self.id,
            score: self.score,
        }
    }
}

/// Attach auth and version headers.
fn authorize(request: RequestBuilder, api_key: &str, api_version: &str) -> RequestBuilder {
    request
        .header(API_KEY_HEADER, api_key)
        .header(API_VERSION_HEADER, api_version)
}

/// Turn a non-success response into a vector store error carrying the API message.
async fn read_json<T: DeserializeOwned>(response: Response, action: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        error!(%status, action, "Pinecone request failed");
        return Err(FolioError::VectorStore(format!(
            "{} failed with {}: {}",
            action, status, detail
        )));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| FolioError::VectorStore(format!("{}: invalid response: {}", action, e)))
}

/// Base URL of an index's data plane. Hosts without a scheme use HTTPS.
fn data_plane_url(host: &str) -> Result<Url> {
    if host.trim().is_empty() {
        return Err(FolioError::VectorStore(
            "index has no data-plane host yet".to_string(),
        ));
    }
    let raw = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    };
    let mut url = Url::parse(&raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Reject indexes whose scores are not cosine similarities.
pub fn check_metric(description: &IndexDescription) -> Result<()> {
    if description.metric == METRIC {
        Ok(())
    } else {
        Err(FolioError::VectorStore(format!(
            "index '{}' uses metric '{}', but only '{}' is supported",
            description.name, description.metric, METRIC
        )))
    }
}

/// Control-plane client.
pub struct PineconeClient {
    http: reqwest::Client,
    api_key: String,
    api_version: String,
    control_plane: Url,
    ready_timeout: Duration,
}

impl PineconeClient {
    pub fn new(api_key: impl Into<String>, settings: &VectorStoreSettings) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FolioError::VectorStore(
                "API key must not be empty".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            api_key,
            api_version: settings.api_version.clone(),
            control_plane: data_plane_url(&settings.control_plane_url)?,
            ready_timeout: Duration::from_secs(settings.ready_timeout_secs),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.control_plane.join(path)?)
    }

    /// List every index in the project.
    pub async fn list_indexes(&self) -> Result<Vec<IndexDescription>> {
        let request = self.http.get(self.endpoint("indexes")?);
        let response = authorize(request, &self.api_key, &self.api_version)
            .send()
            .await?;
        let list: IndexList = read_json(response, "list indexes").await?;
        Ok(list.indexes)
    }

    /// Describe one index, or `None` if it does not exist.
    pub async fn describe_index(&self, name: &str) -> Result<Option<IndexDescription>> {
        let request = self.http.get(self.endpoint(&format!("indexes/{}", name))?);
        let response = authorize(request, &self.api_key, &self.api_version)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        read_json(response, "describe index").await.map(Some)
    }

    /// Create a serverless index.
    pub async fn create_index(
        &self,
        name: &str,
        dimension: usize,
        cloud: &str,
        region: &str,
    ) -> Result<IndexDescription> {
        let body = CreateIndexRequest {
            name,
            dimension,
            metric: METRIC,
            spec: IndexSpec {
                serverless: ServerlessSpec { cloud, region },
            },
        };
        let request = self.http.post(self.endpoint("indexes")?).json(&body);
        let response = authorize(request, &self.api_key, &self.api_version)
            .send()
            .await?;
        read_json(response, "create index").await
    }

    /// Poll until the index reports ready, bounded by the configured timeout.
    pub async fn wait_until_ready(&self, name: &str) -> Result<IndexDescription> {
        let started = Instant::now();
        loop {
            match self.describe_index(name).await? {
                Some(description) if description.status.ready => return Ok(description),
                Some(description) => {
                    debug!("Index '{}' is {}", name, description.status.state)
                }
                None => debug!("Index '{}' not visible yet", name),
            }

            if started.elapsed() >= self.ready_timeout {
                return Err(FolioError::VectorStore(format!(
                    "index '{}' was not ready after {}s",
                    name,
                    self.ready_timeout.as_secs()
                )));
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }

    /// Return the named index, creating it with `dimension` when absent.
    ///
    /// An existing index is used as-is, even when its dimension differs; the
    /// caller compares dimensions before writing.
    pub async fn ensure_index(
        &self,
        name: &str,
        dimension: usize,
        cloud: &str,
        region: &str,
    ) -> Result<IndexDescription> {
        let existing = self
            .list_indexes()
            .await?
            .into_iter()
            .find(|index| index.name == name);

        let description = match existing {
            Some(description) => {
                debug!("Using existing index '{}'", name);
                check_metric(&description)?;
                description
            }
            None => {
                info!(
                    "Creating index '{}' ({} dims, {}, {}/{})",
                    name, dimension, METRIC, cloud, region
                );
                self.create_index(name, dimension, cloud, region).await?
            }
        };

        if description.status.ready {
            Ok(description)
        } else {
            self.wait_until_ready(name).await
        }
    }

    /// Open a data-plane handle for a described index.
    pub fn index(&self, description: &IndexDescription) -> Result<PineconeIndex> {
        check_metric(description)?;
        Ok(PineconeIndex {
            http: self.http.clone(),
            api_key: self.api_key.clone(),
            api_version: self.api_version.clone(),
            base: data_plane_url(&description.host)?,
            name: description.name.clone(),
            dimension: description.dimension.unwrap_or(0),
        })
    }
}

/// Data-plane handle to one index.
pub struct PineconeIndex {
    http: reqwest::Client,
    api_key: String,
    api_version: String,
    base: Url,
    name: String,
    dimension: usize,
}

impl PineconeIndex {
    async fn post<B, T>(&self, path: &str, body: &B, action: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(path, body).await?;
        read_json(response, action).await
    }

    async fn send<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let request = self.http.post(self.base.join(path)?).json(body);
        Ok(authorize(request, &self.api_key, &self.api_version)
            .send()
            .await?)
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn upsert(&self, vectors: &[IndexedVector], namespace: &str) -> Result<usize> {
        if vectors.is_empty() {
            return Ok(0);
        }
        check_dimensions(&self.name, self.dimension, vectors)?;

        let body = UpsertRequest {
            vectors: vectors
                .iter()
                .map(|v| VectorRecord {
                    id: &v.id,
                    values: &v.values,
                    metadata: v.metadata(),
                })
                .collect(),
            namespace,
        };
        let response: UpsertResponse = self.post("vectors/upsert", &body, "upsert").await?;
        debug!(
            "Upserted {} vectors into {}/{}",
            response.upserted_count, self.name, namespace
        );
        Ok(response.upserted_count)
    }

    async fn query(
        &self,
        embedding: &[f32],
        top_k: usize,
        namespace: &str,
    ) -> Result<Vec<SearchResult>> {
        if top_k == 0 {
            return Ok(Vec::new());
        }
        if embedding.len() != self.dimension {
            return Err(FolioError::DimensionMismatch {
                index: self.name.clone(),
                index_dimension: self.dimension,
                embedding_dimension: embedding.len(),
            });
        }

        let body = QueryRequest {
            namespace,
            vector: embedding,
            top_k,
            include_metadata: true,
            include_values: false,
        };
        let response: QueryResponse = self.post("query", &body, "query").await?;

        let mut results: Vec<SearchResult> = response
            .matches
            .into_iter()
            .map(QueryMatch::into_result)
            .collect();
        rank_results(&mut results);
        results.truncate(top_k);
        Ok(results)
    }

    async fn count(&self, namespace: &str) -> Result<usize> {
        let stats: IndexStats = self
            .post(
                "describe_index_stats",
                &serde_json::json!({}),
                "describe index stats",
            )
            .await?;
        Ok(namespace_count(&stats, namespace))
    }

    async fn clear(&self, namespace: &str) -> Result<()> {
        let body = DeleteRequest {
            delete_all: true,
            namespace,
        };
        let response = self.send("vectors/delete", &body).await?;
        // Deleting from a namespace that was never written returns 404.
        if response.status() == StatusCode::NOT_FOUND {
            debug!("Namespace '{}' did not exist", namespace);
            return Ok(());
        }
        let _: IgnoredAny = read_json(response, "delete").await?;
        info!("Cleared namespace '{}' of index '{}'", namespace, self.name);
        Ok(())
    }
}

fn namespace_count(stats: &IndexStats, namespace: &str) -> usize {
    stats
        .namespaces
        .get(namespace)
        .map(|ns| ns.vector_count)
        .unwrap_or(0)
}
