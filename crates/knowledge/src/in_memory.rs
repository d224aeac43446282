//! In-memory vector store — useful for testing and local runs without Qdrant.

use async_trait::async_trait;
use docuforge_core::error::RetrievalError;
use docuforge_core::store::{ScoredPoint, VectorPoint, VectorStore};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::vector::rank_points;

/// A vector store that keeps points in a Vec and ranks by cosine similarity.
pub struct InMemoryVectorStore {
    collection: String,
    dimensions: RwLock<Option<usize>>,
    points: Arc<RwLock<Vec<VectorPoint>>>,
}

impl InMemoryVectorStore {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            dimensions: RwLock::new(None),
            points: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new("vaisala_docs")
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn collection(&self) -> &str {
        &self.collection
    }

    async fn ensure_collection(&self, dimensions: usize) -> Result<bool, RetrievalError> {
        let mut dims = self.dimensions.write().await;
        match *dims {
            Some(existing) if existing != dimensions => Err(RetrievalError::CollectionSetup {
                collection: self.collection.clone(),
                reason: format!("existing collection has {existing} dimensions, requested {dimensions}"),
            }),
            Some(_) => Ok(false),
            None => {
                *dims = Some(dimensions);
                Ok(true)
            }
        }
    }

    async fn upsert(&self, points: Vec<VectorPoint>) -> Result<usize, RetrievalError> {
        let expected = *self.dimensions.read().await;
        if let Some(bad) = expected.and_then(|d| points.iter().find(|p| p.vector.len() != d)) {
            return Err(RetrievalError::Storage(format!(
                "point '{}' has {} dimensions, collection '{}' expects {}",
                bad.id,
                bad.vector.len(),
                self.collection,
                expected.unwrap_or_default()
            )));
        }

        let written = points.len();
        let mut stored = self.points.write().await;
        for point in points {
            match stored.iter_mut().find(|p| p.id == point.id) {
                Some(existing) => *existing = point,
                None => stored.push(point),
            }
        }
        Ok(written)
    }

    async fn query(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredPoint>, RetrievalError> {
        let points = self.points.read().await;
        Ok(rank_points(&points, vector, limit))
    }

    async fn count(&self) -> Result<usize, RetrievalError> {
        Ok(self.points.read().await.len())
    }
}
