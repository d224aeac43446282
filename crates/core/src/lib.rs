//! # DocuForge Core
//!
//! Domain types, collaborator traits, and error definitions for DocuForge.
//! This crate has **zero framework dependencies** — it defines the contracts
//! that the provider, knowledge, and agent crates implement against.
//!
//! ## Collaborators
//!
//! The revision loop only ever talks to two external capabilities:
//! - [`Provider`] — text generation (and embeddings)
//! - [`Retriever`] — semantic search over ingested knowledge
//!
//! Both are passed around as `Arc<dyn Trait>` so tests can substitute
//! scripted implementations without touching globals.

pub mod error;
pub mod message;
pub mod provider;
pub mod retrieval;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, RetrievalError};
pub use message::{Message, Role};
pub use provider::{EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, ProviderResponse, Usage};
pub use retrieval::{RetrievedChunk, Retriever};
pub use store::{ScoredPoint, VectorPoint, VectorStore};
