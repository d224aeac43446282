//! Error types for the DocuForge domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each collaborator has its own error enum; the top-level [`Error`]
//! wraps them so a single `?` carries a failure out of a workflow run.

use thiserror::Error;

/// The top-level error type for all DocuForge operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Collaborator failures ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    // --- Workflow control ---
    #[error("Workflow cancelled before revision {revision}")]
    Cancelled { revision: u32 },

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error came from an external collaborator (generation
    /// service or knowledge store). The HTTP boundary maps these to 503.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, Error::Provider(_) | Error::Retrieval(_))
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Collaborator errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum RetrievalError {
    #[error("Vector store unreachable: {0}")]
    Unavailable(String),

    #[error("Collection setup failed for '{collection}': {reason}")]
    CollectionSetup { collection: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn collaborator_failures_are_classified() {
        assert!(Error::from(ProviderError::Network("reset".into())).is_collaborator_failure());
        assert!(
            Error::from(RetrievalError::QueryFailed("bad vector".into())).is_collaborator_failure()
        );
        assert!(!Error::Internal("oops".into()).is_collaborator_failure());
        assert!(!Error::Cancelled { revision: 2 }.is_collaborator_failure());
    }

    #[test]
    fn every_variant_has_an_http_class() {
        let variants = [
            Error::Provider(ProviderError::Timeout("slow".into())),
            Error::Retrieval(RetrievalError::Unavailable("down".into())),
            Error::Cancelled { revision: 1 },
            Error::Internal("bug".into()),
        ];
        let collaborator: Vec<bool> = variants
            .iter()
            .map(|e| match e {
                Error::Provider(_) | Error::Retrieval(_) => true,
                Error::Cancelled { .. } | Error::Internal(_) => false,
            })
            .collect();
        let classified: Vec<bool> = variants.iter().map(Error::is_collaborator_failure).collect();
        assert_eq!(collaborator, classified);
    }

    #[test]
    fn collection_setup_error_names_collection() {
        let err = RetrievalError::CollectionSetup {
            collection: "vaisala_docs".into(),
            reason: "connection refused".into(),
        };
        assert!(err.to_string().contains("vaisala_docs"));
        assert!(err.to_string().contains("connection refused"));
    }
}
