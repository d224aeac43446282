//! Retriever trait — semantic search over ingested knowledge.
//!
//! A retriever turns a query string into an ordered list of knowledge
//! chunks, highest relevance first. An empty list is a valid answer and
//! never an error.

use crate::error::RetrievalError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single piece of retrieved context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// The chunk text
    pub content: String,

    /// Filename or origin of the document the chunk came from
    pub source: String,

    /// Relevance score (higher is more relevant)
    pub score: f32,
}

/// The core Retriever trait.
///
/// Implementations: the embedding-backed ingestion service, and fixed
/// fixtures in tests.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return at most `limit` chunks relevant to `query`, best first.
    async fn retrieve(
        &self,
        query: &str,
        limit: usize,
    ) -> std::result::Result<Vec<RetrievedChunk>, RetrievalError>;
}
