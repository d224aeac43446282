//! Shared test helpers: scripted generation and fixed retrieval.

use async_trait::async_trait;
use docuforge_core::error::{ProviderError, RetrievalError};
use docuforge_core::message::Message;
use docuforge_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use docuforge_core::retrieval::{RetrievedChunk, Retriever};
use std::sync::Mutex;

/// A mock provider that replays scripted replies in order.
///
/// Once the script is exhausted the last reply repeats. A call whose
/// 1-based number equals `fail_on` returns a network error instead.
pub struct ScriptedProvider {
    replies: Vec<String>,
    fail_on: Option<usize>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: replies.into_iter().map(String::from).collect(),
            fail_on: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail the `n`th call (1-based).
    pub fn failing_on(mut self, n: usize) -> Self {
        self.fail_on = Some(n);
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Prompts that were draft requests (as opposed to reviews).
    pub fn draft_prompts(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter_map(|r| r.messages.first().map(|m| m.content.clone()))
            .filter(|p| p.contains("Senior Technical Writer"))
            .collect()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };

        if self.fail_on == Some(call) {
            return Err(ProviderError::Network("scripted failure".into()));
        }

        let text = self
            .replies
            .get(call - 1)
            .or_else(|| self.replies.last())
            .cloned()
            .unwrap_or_default();
        Ok(make_text_response(&text))
    }
}

/// Create a simple text response.
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// A retriever that always returns the same chunks.
pub struct FixedRetriever {
    chunks: Vec<RetrievedChunk>,
}

impl FixedRetriever {
    pub fn new(contents: &[&str]) -> Self {
        Self {
            chunks: contents
                .iter()
                .enumerate()
                .map(|(i, c)| RetrievedChunk {
                    content: c.to_string(),
                    source: "fixture.txt".into(),
                    score: 1.0 - i as f32 * 0.1,
                })
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self { chunks: vec![] }
    }
}

#[async_trait]
impl Retriever for FixedRetriever {
    async fn retrieve(&self, _query: &str, limit: usize) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        Ok(self.chunks.iter().take(limit).cloned().collect())
    }
}

/// A retriever whose backend is down.
pub struct DownRetriever;

#[async_trait]
impl Retriever for DownRetriever {
    async fn retrieve(&self, _query: &str, _limit: usize) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        Err(RetrievalError::Unavailable("connection refused".into()))
    }
}
