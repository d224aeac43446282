//! `docuforge generate` — Draft and review a document for a topic.
//!
//! Ctrl-C stops the run before the next draft.

use docuforge_agent::{DocumentWorkflow, Generator, RevisionLoop};
use docuforge_config::AppConfig;
use docuforge_core::Retriever;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub async fn run(config: AppConfig, topic: String) -> Result<(), Box<dyn std::error::Error>> {
    let (provider, ingestion) = super::knowledge_base(&config).await?;

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nCancelling after the current step...");
            flag.store(true, Ordering::Relaxed);
        }
    });

    let revision_loop = RevisionLoop::new(Generator::from_config(provider, &config))
        .with_max_revisions(config.workflow.max_revisions)
        .with_cancellation(cancel);
    let retriever: Arc<dyn Retriever> = ingestion;
    let workflow = DocumentWorkflow::new(retriever, revision_loop)
        .with_retrieval_limit(config.retrieval.limit);

    let outcome = workflow.generate(&topic).await?;

    println!("{}", outcome.final_document.as_deref().unwrap_or_default());
    println!();
    println!("── {} revision(s), {}", outcome.revisions, outcome.termination_reason);
    if let Some(critique) = &outcome.final_critique {
        println!("── Final critique: {critique}");
    }
    Ok(())
}
