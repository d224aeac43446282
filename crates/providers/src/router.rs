//! Provider router — builds the generation/embedding provider from config.
//!
//! The configured `provider` becomes the head of the chain. Names listed in
//! `fallback` are appended in order and wrapped in a [`FallbackProvider`].

use std::sync::Arc;
use std::time::Duration;

use docuforge_config::{AppConfig, ConfigError};
use docuforge_core::provider::Provider;
use tracing::info;

use crate::fallback::FallbackProvider;
use crate::openai_compat::OpenAiCompatProvider;

/// Build the provider described by `config`.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ConfigError> {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let primary = build_named(config, &config.provider, timeout)?;

    if config.fallback.is_empty() {
        return Ok(primary);
    }

    let mut chain = FallbackProvider::new("fallback").add(primary, timeout);
    for name in &config.fallback {
        if name == &config.provider {
            continue;
        }
        chain = chain.add(build_named(config, name, timeout)?, timeout);
    }

    info!(providers = chain.len(), "Provider fallback chain configured");
    Ok(Arc::new(chain))
}

fn build_named(
    config: &AppConfig,
    name: &str,
    timeout: Duration,
) -> Result<Arc<dyn Provider>, ConfigError> {
    let base_url = config
        .providers
        .get(name)
        .and_then(|p| p.api_url.clone())
        .unwrap_or_else(|| default_base_url(name));

    let api_key = config.api_key_for(name).unwrap_or_default();

    let provider = OpenAiCompatProvider::new(name, base_url, api_key, timeout)
        .map_err(|e| ConfigError::ValidationError(format!("provider '{name}': {e}")))?;

    Ok(Arc::new(provider))
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
