//! Revision state threaded through the draft/critique loop.

use serde::Serialize;

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Drafting,
    Critiquing,
    Terminated,
}

/// The single record passed through one workflow run.
///
/// Fields are private; only the step transitions below change them, so
/// `revision_count` always equals the number of drafts produced.
#[derive(Debug, Clone, Serialize)]
pub struct RevisionState {
    query: String,
    context: Vec<String>,
    draft: Option<String>,
    critique: Option<String>,
    revision_count: u32,
    final_doc: Option<String>,
    phase: Phase,
}

impl RevisionState {
    pub fn new(query: impl Into<String>, context: Vec<String>) -> Self {
        Self {
            query: query.into(),
            context,
            draft: None,
            critique: None,
            revision_count: 0,
            final_doc: None,
            phase: Phase::Drafting,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// Context entries joined one per line, as sent to the model.
    pub fn joined_context(&self) -> String {
        self.context.join("\n")
    }

    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    pub fn critique(&self) -> Option<&str> {
        self.critique.as_deref()
    }

    pub fn revision_count(&self) -> u32 {
        self.revision_count
    }

    pub fn final_doc(&self) -> Option<&str> {
        self.final_doc.as_deref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Record a new draft. Increments the revision counter by exactly one.
    pub(crate) fn with_draft(mut self, draft: String) -> Self {
        self.draft = Some(draft);
        self.revision_count += 1;
        self.phase = Phase::Critiquing;
        self
    }

    /// Record the reviewer's feedback. The counter is untouched.
    pub(crate) fn with_critique(mut self, critique: String) -> Self {
        self.critique = Some(critique);
        self
    }

    /// Send the state back for another draft.
    pub(crate) fn reopen(mut self) -> Self {
        self.phase = Phase::Drafting;
        self
    }

    /// Stop the loop; the current draft becomes the final document.
    pub(crate) fn terminate(mut self) -> Self {
        self.final_doc = self.draft.clone();
        self.phase = Phase::Terminated;
        self
    }

    #[cfg(test)]
    pub(crate) fn reviewed(critique: &str, revision_count: u32) -> Self {
        let mut state = Self::new("HMP155 Power Requirements", vec![]);
        state.draft = Some("draft".into());
        state.critique = Some(critique.into());
        state.revision_count = revision_count;
        state.phase = Phase::Critiquing;
        state
    }
}
