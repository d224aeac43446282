//! Workflow entry points: retrieve context, run the revision loop, report.

use docuforge_config::AppConfig;
use docuforge_core::Result;
use docuforge_core::provider::Provider;
use docuforge_core::retrieval::{RetrievedChunk, Retriever};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::controller::{RevisionLoop, TerminationReason};
use crate::generator::Generator;
use crate::state::RevisionState;

/// Context used when retrieval finds nothing.
pub const EMPTY_CONTEXT_PLACEHOLDER: &str = "No specific context found in knowledge base.";

/// Result of one workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowOutcome {
    pub final_document: Option<String>,
    pub revisions: u32,
    pub final_critique: Option<String>,
    pub termination_reason: TerminationReason,
}

/// Turn retrieval results into loop context, substituting the placeholder
/// when there are none.
pub fn contextualize(topic: &str, chunks: Vec<RetrievedChunk>) -> Vec<String> {
    ensure_context(topic, chunks.into_iter().map(|c| c.content).collect())
}

/// An empty context becomes exactly one placeholder entry.
fn ensure_context(topic: &str, context: Vec<String>) -> Vec<String> {
    if context.is_empty() {
        warn!(topic = %topic, "No context found, using placeholder");
        return vec![EMPTY_CONTEXT_PLACEHOLDER.to_string()];
    }
    context
}

/// Run the revision loop for `topic` over pre-fetched `context`.
///
/// An empty `context` is replaced by the placeholder entry.
/// All-or-nothing: any collaborator failure discards partial drafts.
pub async fn run_workflow(
    revision_loop: &RevisionLoop,
    topic: &str,
    context: Vec<String>,
) -> Result<WorkflowOutcome> {
    let context = ensure_context(topic, context);
    let (state, reason) = revision_loop.run(RevisionState::new(topic, context)).await?;

    info!(
        topic = %topic,
        revisions = state.revision_count(),
        reason = %reason,
        "Workflow complete"
    );

    Ok(WorkflowOutcome {
        final_document: state.final_doc().map(String::from),
        revisions: state.revision_count(),
        final_critique: state.critique().map(String::from),
        termination_reason: reason,
    })
}

/// Retrieval plus revision loop, bundled for callers such as the gateway.
pub struct DocumentWorkflow {
    retriever: Arc<dyn Retriever>,
    revision_loop: RevisionLoop,
    retrieval_limit: usize,
}

impl DocumentWorkflow {
    pub fn new(retriever: Arc<dyn Retriever>, revision_loop: RevisionLoop) -> Self {
        Self {
            retriever,
            revision_loop,
            retrieval_limit: 3,
        }
    }

    pub fn from_config(
        provider: Arc<dyn Provider>,
        retriever: Arc<dyn Retriever>,
        config: &AppConfig,
    ) -> Self {
        let revision_loop = RevisionLoop::new(Generator::from_config(provider, config))
            .with_max_revisions(config.workflow.max_revisions);
        Self::new(retriever, revision_loop).with_retrieval_limit(config.retrieval.limit)
    }

    pub fn with_retrieval_limit(mut self, limit: usize) -> Self {
        self.retrieval_limit = limit.max(1);
        self
    }

    /// Retrieve context for `topic` and produce a reviewed document.
    pub async fn generate(&self, topic: &str) -> Result<WorkflowOutcome> {
        info!(topic = %topic, "Starting generation workflow");

        let chunks = self.retriever.retrieve(topic, self.retrieval_limit).await?;
        let context = contextualize(topic, chunks);

        run_workflow(&self.revision_loop, topic, context).await
    }
}
