//! Critique Step: review the current draft.

use docuforge_core::{Error, Result};
use tracing::info;

use crate::generator::Generator;
use crate::prompts::critique_prompt;
use crate::state::RevisionState;

/// Run one Critique Step. Replaces the critique with the reviewer's reply.
///
/// Requires a draft; calling it before any Draft Step is an internal error.
pub async fn critique_step(generator: &Generator, state: RevisionState) -> Result<RevisionState> {
    let Some(draft) = state.draft() else {
        return Err(Error::Internal("critique requested before any draft".into()));
    };

    info!(revision = state.revision_count(), "Critic is reviewing");
    let prompt = critique_prompt(&state, draft);

    let critique = generator.generate(prompt).await?;
    Ok(state.with_critique(critique))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::draft_step;
    use crate::test_helpers::ScriptedProvider;
    use std::sync::Arc;

    #[tokio::test]
    async fn critique_keeps_revision_count() {
        let provider = Arc::new(ScriptedProvider::new(vec!["draft", "Too passive."]));
        let generator = Generator::new(provider.clone(), "m");

        let state = draft_step(&generator, RevisionState::new("q", vec![])).await.unwrap();
        let state = critique_step(&generator, state).await.unwrap();

        assert_eq!(state.revision_count(), 1);
        assert_eq!(state.critique(), Some("Too passive."));
        assert!(provider.requests()[1].messages[0].content.contains("CURRENT DRAFT:\ndraft"));
    }

    #[tokio::test]
    async fn critique_without_draft_is_internal_error() {
        let provider = Arc::new(ScriptedProvider::new(vec!["APPROVE"]));
        let generator = Generator::new(provider.clone(), "m");

        let err = critique_step(&generator, RevisionState::new("q", vec![])).await.unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
        assert_eq!(provider.call_count(), 0);
    }
}
