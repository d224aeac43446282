//! Knowledge base for DocuForge.
//!
//! Provides:
//! - **TextSplitter**: recursive character chunking
//! - **Vector stores**: in-memory and Qdrant (REST) `VectorStore` backends
//! - **IngestionService**: embed + store documents, and semantic search
//!   exposed as a `Retriever`

pub mod in_memory;
pub mod ingestion;
pub mod qdrant;
pub mod splitter;
pub mod vector;

pub use in_memory::InMemoryVectorStore;
pub use ingestion::{IngestResult, IngestionService, MAX_SEARCH_LIMIT};
pub use qdrant::QdrantStore;
pub use splitter::TextSplitter;

use docuforge_config::{AppConfig, VectorBackend};
use docuforge_core::error::RetrievalError;
use docuforge_core::provider::Provider;
use docuforge_core::store::VectorStore;
use std::sync::Arc;

/// Build the vector store selected by `config.vector_store.backend`.
pub fn build_store_from_config(config: &AppConfig) -> Result<Arc<dyn VectorStore>, RetrievalError> {
    let store_config = &config.vector_store;
    let store: Arc<dyn VectorStore> = match store_config.backend {
        VectorBackend::Qdrant => Arc::new(QdrantStore::new(store_config.url(), &store_config.collection)?),
        VectorBackend::Memory => Arc::new(InMemoryVectorStore::new(&store_config.collection)),
    };
    Ok(store)
}

/// Build the ingestion service from config, sharing `provider` for embeddings.
pub fn build_ingestion_from_config(
    config: &AppConfig,
    provider: Arc<dyn Provider>,
) -> Result<IngestionService, RetrievalError> {
    let store = build_store_from_config(config)?;
    let splitter = TextSplitter::new(config.ingestion.chunk_size, config.ingestion.chunk_overlap);

    Ok(
        IngestionService::new(provider, store, &config.embedding.model, config.embedding.dimensions)
            .with_splitter(splitter),
    )
}
