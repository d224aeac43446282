//! Provider fallback — ordered failover chain with per-provider timeouts.
//!
//! The revision loop never retries a failed generation call itself; any
//! resilience lives here. When a provider fails (timeout, rate limit,
//! error), the chain tries the next provider. When every entry fails the
//! last error is returned and the workflow run aborts.

use async_trait::async_trait;
use docuforge_core::error::ProviderError;
use docuforge_core::provider::*;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Timeout applied by [`FallbackProvider::add_default`].
const DEFAULT_ENTRY_TIMEOUT: Duration = Duration::from_secs(120);

/// Ordered failover chain over several providers.
pub struct FallbackProvider {
    name: String,
    chain: Vec<FallbackEntry>,
}

struct FallbackEntry {
    provider: Arc<dyn Provider>,
    timeout: Duration,
}

impl FallbackProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chain: Vec::new(),
        }
    }

    /// Append `provider`; each call to it is bounded by `timeout`.
    pub fn add(mut self, provider: Arc<dyn Provider>, timeout: Duration) -> Self {
        self.chain.push(FallbackEntry { provider, timeout });
        self
    }

    pub fn add_default(self, provider: Arc<dyn Provider>) -> Self {
        self.add(provider, DEFAULT_ENTRY_TIMEOUT)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Run `call` against each entry in order until one succeeds.
    ///
    /// An entry that errors or exceeds its timeout hands over to the next.
    /// The error of the final entry is returned when the chain is exhausted.
    async fn failover<T, F, Fut>(&self, operation: &'static str, call: F) -> Result<T, ProviderError>
    where
        T: Send,
        F: Fn(Arc<dyn Provider>) -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, ProviderError>> + Send,
    {
        let mut last_error = ProviderError::NotConfigured(format!(
            "Fallback chain '{}' has no providers",
            self.name
        ));

        for (position, entry) in self.chain.iter().enumerate() {
            let provider = entry.provider.name().to_string();
            debug!(%provider, operation, position, "Dispatching to chain entry");

            last_error = match tokio::time::timeout(entry.timeout, call(entry.provider.clone())).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) => e,
                Err(_) => ProviderError::Timeout(format!(
                    "{operation} on '{provider}' exceeded {}ms",
                    entry.timeout.as_millis()
                )),
            };

            if position + 1 < self.chain.len() {
                warn!(%provider, operation, error = %last_error, "Chain entry failed, failing over");
            }
        }

        Err(last_error)
    }
}

#[async_trait]
impl Provider for FallbackProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        self.failover("completion", |provider| {
            let request = request.clone();
            async move { provider.complete(request).await }
        })
        .await
    }

    async fn embed(
        &self,
        request: EmbeddingRequest,
    ) -> std::result::Result<EmbeddingResponse, ProviderError> {
        self.failover("embedding", |provider| {
            let request = request.clone();
            async move { provider.embed(request).await }
        })
        .await
    }

    /// Healthy when any entry answers its own check within its timeout.
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let reachable = self
            .failover("health check", |provider| async move {
                match provider.health_check().await {
                    Ok(true) => Ok(()),
                    Ok(false) => Err(ProviderError::Network(format!(
                        "'{}' reported unhealthy",
                        provider.name()
                    ))),
                    Err(e) => Err(e),
                }
            })
            .await;

        match reachable {
            Ok(()) => Ok(true),
            Err(ProviderError::NotConfigured(message)) if self.chain.is_empty() => {
                Err(ProviderError::NotConfigured(message))
            }
            Err(_) => Ok(false),
        }
    }
}
