//! Qdrant vector store over the REST API.
//!
//! Endpoints used:
//! - `GET  /collections` (existence check)
//! - `PUT  /collections/{name}` (create, cosine distance)
//! - `PUT  /collections/{name}/points?wait=true` (upsert)
//! - `POST /collections/{name}/points/query` (similarity search)
//! - `POST /collections/{name}/points/count`

use async_trait::async_trait;
use docuforge_core::error::RetrievalError;
use docuforge_core::store::{ScoredPoint, VectorPoint, VectorStore};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

pub struct QdrantStore {
    base_url: String,
    collection: String,
    client: reqwest::Client,
}

impl QdrantStore {
    /// Create a store for `collection` on the Qdrant server at `base_url`.
    pub fn new(base_url: impl Into<String>, collection: impl Into<String>) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| RetrievalError::Unavailable(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
            client,
        })
    }

    fn collection_url(&self, suffix: &str) -> String {
        format!("{}/collections/{}{}", self.base_url, self.collection, suffix)
    }

    async fn collection_exists(&self) -> Result<bool, RetrievalError> {
        let response = self
            .client
            .get(format!("{}/collections", self.base_url))
            .send()
            .await
            .map_err(unavailable)?;

        let body: QdrantEnvelope<CollectionList> = read_json(response, RetrievalError::Storage).await?;
        Ok(body.result.collections.iter().any(|c| c.name == self.collection))
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    fn name(&self) -> &str {
        "qdrant"
    }

    fn collection(&self) -> &str {
        &self.collection
    }

    async fn ensure_collection(&self, dimensions: usize) -> Result<bool, RetrievalError> {
        if self.collection_exists().await? {
            debug!(collection = %self.collection, "Qdrant collection already exists");
            return Ok(false);
        }

        let body = serde_json::json!({
            "vectors": { "size": dimensions, "distance": "Cosine" }
        });

        let response = self
            .client
            .put(self.collection_url(""))
            .json(&body)
            .send()
            .await
            .map_err(unavailable)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(RetrievalError::CollectionSetup {
                collection: self.collection.clone(),
                reason: format!("HTTP {status}: {text}"),
            });
        }

        info!(collection = %self.collection, dimensions, "Created Qdrant collection");
        Ok(true)
    }

    async fn upsert(&self, points: Vec<VectorPoint>) -> Result<usize, RetrievalError> {
        if points.is_empty() {
            return Ok(0);
        }
        let written = points.len();

        let response = self
            .client
            .put(self.collection_url("/points?wait=true"))
            .json(&serde_json::json!({ "points": points }))
            .send()
            .await
            .map_err(unavailable)?;

        let _: QdrantEnvelope<serde_json::Value> = read_json(response, RetrievalError::Storage).await?;
        debug!(collection = %self.collection, points = written, "Upserted points");
        Ok(written)
    }

    async fn query(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredPoint>, RetrievalError> {
        let body = serde_json::json!({
            "query": vector,
            "limit": limit,
            "with_payload": true,
        });

        let response = self
            .client
            .post(self.collection_url("/points/query"))
            .json(&body)
            .send()
            .await
            .map_err(unavailable)?;

        let body: QdrantEnvelope<QueryResult> = read_json(response, RetrievalError::QueryFailed).await?;
        Ok(body.result.into_scored_points())
    }

    async fn count(&self) -> Result<usize, RetrievalError> {
        let response = self
            .client
            .post(self.collection_url("/points/count"))
            .json(&serde_json::json!({ "exact": true }))
            .send()
            .await
            .map_err(unavailable)?;

        let body: QdrantEnvelope<CountResult> = read_json(response, RetrievalError::QueryFailed).await?;
        Ok(body.result.count)
    }
}

fn unavailable(e: reqwest::Error) -> RetrievalError {
    RetrievalError::Unavailable(e.to_string())
}

async fn read_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
    on_error: fn(String) -> RetrievalError,
) -> Result<T, RetrievalError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(on_error(format!("HTTP {}: {text}", status.as_u16())));
    }

    response
        .json()
        .await
        .map_err(|e| on_error(format!("Failed to parse Qdrant response: {e}")))
}

// --- Qdrant wire types ---

#[derive(Deserialize)]
struct QdrantEnvelope<T> {
    result: T,
}

#[derive(Deserialize)]
struct CollectionList {
    collections: Vec<CollectionDescription>,
}

#[derive(Deserialize)]
struct CollectionDescription {
    name: String,
}

#[derive(Deserialize)]
struct QueryResult {
    points: Vec<QdrantPoint>,
}

impl QueryResult {
    fn into_scored_points(self) -> Vec<ScoredPoint> {
        self.points
            .into_iter()
            .map(|p| ScoredPoint {
                // Qdrant ids are either UUID strings or unsigned integers
                id: match p.id {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                },
                score: p.score,
                payload: p.payload.unwrap_or_default(),
            })
            .collect()
    }
}

#[derive(Deserialize)]
struct QdrantPoint {
    id: serde_json::Value,
    score: f32,
    #[serde(default)]
    payload: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Deserialize)]
struct CountResult {
    count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_url_strips_trailing_slash() {
        let store = QdrantStore::new("http://qdrant:6333/", "vaisala_docs").unwrap();
        assert_eq!(
            store.collection_url("/points/query"),
            "http://qdrant:6333/collections/vaisala_docs/points/query"
        );
        assert_eq!(store.collection(), "vaisala_docs");
    }

    #[test]
    fn parse_query_response() {
        let json = serde_json::json!({
            "result": {
                "points": [
                    {
                        "id": "5c56c793-69f3-4fbf-87e6-c4bf54c28c26",
                        "version": 3,
                        "score": 0.87,
                        "payload": { "content": "Operating range -40 to +60 C", "source": "specs.pdf" }
                    },
                    { "id": 42, "version": 1, "score": 0.5 }
                ]
            },
            "status": "ok",
            "time": 0.002
        });

        let body: QdrantEnvelope<QueryResult> = serde_json::from_value(json).unwrap();
        let points = body.result.into_scored_points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].payload_str("source"), Some("specs.pdf"));
        assert_eq!(points[1].id, "42");
        assert!(points[1].payload.is_empty());
    }

    #[test]
    fn parse_collection_list() {
        let json = serde_json::json!({
            "result": { "collections": [ { "name": "vaisala_docs" }, { "name": "other" } ] },
            "status": "ok"
        });
        let body: QdrantEnvelope<CollectionList> = serde_json::from_value(json).unwrap();
        assert!(body.result.collections.iter().any(|c| c.name == "vaisala_docs"));
    }

    #[tokio::test]
    async fn unreachable_server_is_unavailable() {
        let store = QdrantStore::new("http://127.0.0.1:1", "vaisala_docs").unwrap();
        let err = store.count().await.unwrap_err();
        assert!(matches!(err, RetrievalError::Unavailable(_)));
    }
}
