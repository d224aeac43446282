//! Loop controller — drives Draft → Critique → decide until a stop rule fires.
//!
//! Stop rules, evaluated in order after every critique:
//! 1. The critique contains `APPROVE` (any case): stop, approved.
//! 2. `revision_count >= max_revisions`: stop, limit reached.
//! 3. Otherwise: draft again.
//!
//! The controller never retries or swallows collaborator failures.

use docuforge_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

use crate::critique::critique_step;
use crate::draft::draft_step;
use crate::generator::Generator;
use crate::state::RevisionState;

/// Default safety bound on Draft Steps per run.
pub const DEFAULT_MAX_REVISIONS: u32 = 3;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    Approved,
    LimitReached,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => write!(f, "approved"),
            Self::LimitReached => write!(f, "limit_reached"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Stop(TerminationReason),
}

/// Whether a critique signals approval.
pub fn is_approved(critique: &str) -> bool {
    critique.to_uppercase().contains("APPROVE")
}

/// Decide what happens after a Critique Step. Approval wins over the limit.
pub fn decide(state: &RevisionState, max_revisions: u32) -> Decision {
    if state.critique().is_some_and(is_approved) {
        return Decision::Stop(TerminationReason::Approved);
    }
    if state.revision_count() >= max_revisions {
        return Decision::Stop(TerminationReason::LimitReached);
    }
    Decision::Continue
}

/// The bounded draft/critique loop.
pub struct RevisionLoop {
    generator: Generator,
    max_revisions: u32,
    cancel: Option<Arc<AtomicBool>>,
}

impl RevisionLoop {
    pub fn new(generator: Generator) -> Self {
        Self {
            generator,
            max_revisions: DEFAULT_MAX_REVISIONS,
            cancel: None,
        }
    }

    /// Set the revision bound. Values below 1 are raised to 1.
    pub fn with_max_revisions(mut self, max_revisions: u32) -> Self {
        self.max_revisions = max_revisions.max(1);
        self
    }

    /// Abort the run before the next Draft Step once `flag` is set.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn max_revisions(&self) -> u32 {
        self.max_revisions
    }

    /// Run the loop from `state` until a stop rule fires.
    pub async fn run(&self, mut state: RevisionState) -> Result<(RevisionState, TerminationReason)> {
        loop {
            if self.is_cancelled() {
                warn!(revision = state.revision_count() + 1, "Workflow cancelled");
                return Err(Error::Cancelled {
                    revision: state.revision_count() + 1,
                });
            }

            state = draft_step(&self.generator, state).await?;
            state = critique_step(&self.generator, state).await?;

            match decide(&state, self.max_revisions) {
                Decision::Stop(reason) => {
                    match reason {
                        TerminationReason::Approved => {
                            info!(revisions = state.revision_count(), "Draft approved");
                        }
                        TerminationReason::LimitReached => {
                            warn!(
                                revisions = state.revision_count(),
                                max = self.max_revisions,
                                "Max revisions reached, stopping loop"
                            );
                        }
                    }
                    return Ok((state.terminate(), reason));
                }
                Decision::Continue => {
                    info!(
                        revision = state.revision_count(),
                        max = self.max_revisions,
                        feedback = %preview(state.critique().unwrap_or_default()),
                        "Revision needed"
                    );
                    state = state.reopen();
                }
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// First 50 characters of the feedback, for log lines.
fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(50).collect();
    if text.chars().count() > 50 {
        out.push_str("...");
    }
    out
}
