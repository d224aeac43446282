//! VectorStore trait — persistence for embedded knowledge chunks.
//!
//! Points carry an embedding vector plus a free-form JSON payload; the
//! ingestion pipeline stores chunk text and source metadata in the payload
//! so search results can be turned back into context.

use crate::error::RetrievalError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A point to be written into the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorPoint {
    /// Unique point ID (UUID string)
    pub id: String,

    /// The embedding vector
    pub vector: Vec<f32>,

    /// Arbitrary JSON payload (content, source, user metadata)
    #[serde(default)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

/// A point returned by a similarity query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPoint {
    pub id: String,

    /// Similarity to the query vector
    pub score: f32,

    #[serde(default)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl ScoredPoint {
    /// Read a string field out of the payload.
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(|v| v.as_str())
    }
}

/// The core VectorStore trait.
///
/// Implementations: Qdrant (REST), in-memory (for testing and local runs).
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// The backend name (e.g., "qdrant", "in_memory").
    fn name(&self) -> &str;

    /// The collection this store reads and writes.
    fn collection(&self) -> &str;

    /// Create the collection if it does not exist yet.
    ///
    /// Returns `true` when the collection was created, `false` when it
    /// already existed.
    async fn ensure_collection(&self, dimensions: usize) -> std::result::Result<bool, RetrievalError>;

    /// Insert or replace points. Returns the number of points written.
    async fn upsert(&self, points: Vec<VectorPoint>) -> std::result::Result<usize, RetrievalError>;

    /// Return the `limit` points most similar to `vector`, best first.
    async fn query(
        &self,
        vector: &[f32],
        limit: usize,
    ) -> std::result::Result<Vec<ScoredPoint>, RetrievalError>;

    /// Total number of stored points.
    async fn count(&self) -> std::result::Result<usize, RetrievalError>;
}
