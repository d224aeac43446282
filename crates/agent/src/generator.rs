//! Generation collaborator: one prompt in, one text out.

use docuforge_config::AppConfig;
use docuforge_core::error::ProviderError;
use docuforge_core::message::Message;
use docuforge_core::provider::{Provider, ProviderRequest};
use std::sync::Arc;
use tracing::debug;

/// Wraps a [`Provider`] with the model settings used for every step.
#[derive(Clone)]
pub struct Generator {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl Generator {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.2,
            max_tokens: None,
        }
    }

    /// Build a generator using the model settings in `config`.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(provider, &config.model)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `prompt` as a single user message and return the reply text.
    pub async fn generate(&self, prompt: String) -> Result<String, ProviderError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages: vec![Message::user(prompt)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stop: vec![],
        };

        let response = self.provider.complete(request).await?;
        if let Some(usage) = &response.usage {
            debug!(
                provider = self.provider.name(),
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Generation complete"
            );
        }
        Ok(response.message.content)
    }
}
