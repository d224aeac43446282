//! The revision loop — the heart of DocuForge.
//!
//! A workflow run follows a **Draft → Critique → decide** cycle:
//!
//! 1. **Retrieve** context for the topic (placeholder if nothing matches)
//! 2. **Draft**: the writer produces or revises the document
//! 3. **Critique**: the reviewer checks it against the house rules
//! 4. **Decide**: stop on approval or at the revision limit, else redraft
//!
//! Every run is sequential and owns its own [`RevisionState`]; the
//! provider and retriever are shared behind `Arc`.

pub mod controller;
pub mod critique;
pub mod draft;
pub mod generator;
pub mod prompts;
pub mod state;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use controller::{DEFAULT_MAX_REVISIONS, Decision, RevisionLoop, TerminationReason, decide, is_approved};
pub use generator::Generator;
pub use state::{Phase, RevisionState};
pub use workflow::{DocumentWorkflow, EMPTY_CONTEXT_PLACEHOLDER, WorkflowOutcome, contextualize, run_workflow};
