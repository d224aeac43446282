//! Ingestion pipeline and knowledge-base search.
//!
//! Raw text → chunks → embeddings → vector store. The same service embeds
//! search queries and implements [`Retriever`] for the revision workflow.

use async_trait::async_trait;
use docuforge_core::error::RetrievalError;
use docuforge_core::provider::{EmbeddingRequest, Provider};
use docuforge_core::retrieval::{RetrievedChunk, Retriever};
use docuforge_core::store::{VectorPoint, VectorStore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::splitter::TextSplitter;

/// Upper bound on the number of chunks a single search returns.
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Outcome of ingesting one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestResult {
    Success { chunks_processed: usize },
    Skipped { reason: String },
}

pub struct IngestionService {
    provider: Arc<dyn Provider>,
    store: Arc<dyn VectorStore>,
    splitter: TextSplitter,
    embedding_model: String,
    dimensions: usize,
}

impl IngestionService {
    pub fn new(
        provider: Arc<dyn Provider>,
        store: Arc<dyn VectorStore>,
        embedding_model: impl Into<String>,
        dimensions: usize,
    ) -> Self {
        Self {
            provider,
            store,
            splitter: TextSplitter::default(),
            embedding_model: embedding_model.into(),
            dimensions,
        }
    }

    /// Replace the default splitter.
    pub fn with_splitter(mut self, splitter: TextSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Create the backing collection if missing. Called once at startup.
    pub async fn init(&self) -> Result<(), RetrievalError> {
        let created = self.store.ensure_collection(self.dimensions).await?;
        info!(
            backend = self.store.name(),
            collection = self.store.collection(),
            created,
            "Knowledge base ready"
        );
        Ok(())
    }

    /// Split, embed and store a single document.
    pub async fn process_document(
        &self,
        text: &str,
        source_name: &str,
        metadata: serde_json::Map<String, serde_json::Value>,
    ) -> Result<IngestResult, RetrievalError> {
        info!(source = %source_name, "Processing document");

        let chunks = self.splitter.split(text);
        info!(source = %source_name, chunks = chunks.len(), "Split document into chunks");

        if chunks.is_empty() {
            return Ok(IngestResult::Skipped {
                reason: "Text was empty".into(),
            });
        }

        let vectors = self.embed(chunks.clone()).await.inspect_err(|e| {
            error!(source = %source_name, error = %e, "Embedding failed");
        })?;

        let points: Vec<VectorPoint> = chunks
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(index, (content, vector))| VectorPoint {
                id: Uuid::new_v4().to_string(),
                vector,
                payload: chunk_payload(&content, source_name, index, &metadata),
            })
            .collect();

        let written = self.store.upsert(points).await?;
        Ok(IngestResult::Success {
            chunks_processed: written,
        })
    }

    /// Embed `query` and return the closest stored chunks, best first.
    ///
    /// `limit` is clamped to `1..=MAX_SEARCH_LIMIT`.
    pub async fn search_knowledge_base(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        let mut vectors = self.embed(vec![query.to_string()]).await?;
        let query_vector = vectors
            .pop()
            .ok_or_else(|| RetrievalError::EmbeddingFailed("no vector returned for query".into()))?;

        let limit = limit.clamp(1, MAX_SEARCH_LIMIT);
        let hits = self.store.query(&query_vector, limit).await?;
        debug!(query = %query, hits = hits.len(), "Knowledge base search");

        Ok(hits
            .into_iter()
            .map(|hit| RetrievedChunk {
                content: hit.payload_str("content").unwrap_or_default().to_string(),
                source: hit.payload_str("source").unwrap_or("unknown").to_string(),
                score: hit.score,
            })
            .collect())
    }

    async fn embed(&self, inputs: Vec<String>) -> Result<Vec<Vec<f32>>, RetrievalError> {
        let expected = inputs.len();
        let response = self
            .provider
            .embed(EmbeddingRequest {
                model: self.embedding_model.clone(),
                inputs,
            })
            .await
            .map_err(|e| RetrievalError::EmbeddingFailed(e.to_string()))?;

        if response.embeddings.len() != expected {
            return Err(RetrievalError::EmbeddingFailed(format!(
                "expected {expected} embeddings, got {}",
                response.embeddings.len()
            )));
        }
        Ok(response.embeddings)
    }
}

#[async_trait]
impl Retriever for IngestionService {
    async fn retrieve(&self, query: &str, limit: usize) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        self.search_knowledge_base(query, limit).await
    }
}

/// Build the stored payload: user metadata, overlaid with the chunk fields.
fn chunk_payload(
    content: &str,
    source: &str,
    index: usize,
    metadata: &serde_json::Map<String, serde_json::Value>,
) -> serde_json::Map<String, serde_json::Value> {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    let mut payload = metadata.clone();
    payload.insert("content".into(), content.into());
    payload.insert("source".into(), source.into());
    payload.insert("chunk_index".into(), index.into());
    payload.insert("content_hash".into(), hash.into());
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::InMemoryVectorStore;
    use docuforge_core::error::ProviderError;
    use docuforge_core::provider::{EmbeddingResponse, ProviderRequest, ProviderResponse};

    /// Embeds text into [mentions of "power", mentions of "mount", 1].
    struct KeywordEmbedder;

    #[async_trait]
    impl Provider for KeywordEmbedder {
        fn name(&self) -> &str {
            "keyword"
        }

        async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::NotConfigured("embedding only".into()))
        }

        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
            let embeddings = request
                .inputs
                .iter()
                .map(|text| {
                    let lower = text.to_lowercase();
                    vec![
                        lower.matches("power").count() as f32,
                        lower.matches("mount").count() as f32,
                        0.1,
                    ]
                })
                .collect();
            Ok(EmbeddingResponse {
                embeddings,
                model: request.model,
                usage: None,
            })
        }
    }

    fn service() -> IngestionService {
        IngestionService::new(
            Arc::new(KeywordEmbedder),
            Arc::new(InMemoryVectorStore::default()),
            "text-embedding-3-small",
            3,
        )
    }

    #[tokio::test]
    async fn empty_text_is_skipped() {
        let svc = service();
        let result = svc.process_document("   \n\n ", "blank.txt", Default::default()).await.unwrap();
        assert_eq!(
            result,
            IngestResult::Skipped {
                reason: "Text was empty".into()
            }
        );
        assert_eq!(svc.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn ingest_then_search() {
        let svc = service().with_splitter(TextSplitter::new(60, 0));
        svc.init().await.unwrap();

        let text = "Power the HMP155 with 10 to 28 VDC power supply.\n\n\
                    Mount the probe vertically, mount it away from heat.";
        let mut metadata = serde_json::Map::new();
        metadata.insert("product".into(), serde_json::json!("HMP155"));

        let result = svc.process_document(text, "hmp155.txt", metadata).await.unwrap();
        assert_eq!(result, IngestResult::Success { chunks_processed: 2 });

        let hits = svc.search_knowledge_base("mounting instructions: mount", 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].content.starts_with("Mount the probe"));
        assert_eq!(hits[0].source, "hmp155.txt");
    }

    #[tokio::test]
    async fn search_limit_is_clamped() {
        let svc = service().with_splitter(TextSplitter::new(20, 0));
        svc.init().await.unwrap();

        let text = (0..60).map(|i| format!("Power note {i}.")).collect::<Vec<_>>().join("\n\n");
        let result = svc.process_document(&text, "notes.txt", Default::default()).await.unwrap();
        assert_eq!(result, IngestResult::Success { chunks_processed: 60 });

        let hits = svc.search_knowledge_base("power", 1_000_000).await.unwrap();
        assert_eq!(hits.len(), MAX_SEARCH_LIMIT);

        let hits = svc.search_knowledge_base("power", 0).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn payload_keeps_metadata_and_hash() {
        let mut metadata = serde_json::Map::new();
        metadata.insert("source".into(), serde_json::json!("overridden"));
        metadata.insert("revision".into(), serde_json::json!(2));

        let payload = chunk_payload("Warning: disconnect power first.", "manual.pdf", 0, &metadata);
        assert_eq!(payload["source"], "manual.pdf");
        assert_eq!(payload["revision"], 2);
        assert_eq!(payload["content_hash"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn ingest_result_serializes_with_status_tag() {
        let json = serde_json::to_value(IngestResult::Success { chunks_processed: 4 }).unwrap();
        assert_eq!(json, serde_json::json!({"status": "success", "chunks_processed": 4}));

        let json = serde_json::to_value(IngestResult::Skipped {
            reason: "Text was empty".into(),
        })
        .unwrap();
        assert_eq!(json["status"], "skipped");
    }

    #[tokio::test]
    async fn retriever_on_empty_store_returns_nothing() {
        let svc = service();
        let hits = svc.retrieve("Unobtainium Sensor", 3).await.unwrap();
        assert!(hits.is_empty());
    }
}
