//! Draft Step: produce or revise the document text.

use docuforge_core::Result;
use tracing::info;

use crate::generator::Generator;
use crate::prompts::draft_prompt;
use crate::state::RevisionState;

/// Run one Draft Step. Replaces the draft and bumps the revision counter.
///
/// Generation failures propagate unchanged.
pub async fn draft_step(generator: &Generator, state: RevisionState) -> Result<RevisionState> {
    info!(revision = state.revision_count() + 1, "Drafter is working");

    let draft = generator.generate(draft_prompt(&state)).await?;
    Ok(state.with_draft(draft))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedProvider;
    use docuforge_core::Error;
    use std::sync::Arc;

    #[tokio::test]
    async fn draft_increments_by_exactly_one() {
        let provider = Arc::new(ScriptedProvider::new(vec!["v1", "v2", "v3"]));
        let generator = Generator::new(provider, "m");

        let mut state = RevisionState::new("Wiring guide", vec!["ctx".into()]);
        for expected in 1..=3 {
            let before = state.revision_count();
            state = draft_step(&generator, state).await.unwrap();
            assert_eq!(state.revision_count(), before + 1);
            assert_eq!(state.revision_count(), expected);
        }
        assert_eq!(state.draft(), Some("v3"));
        assert_eq!(state.query(), "Wiring guide");
        assert_eq!(state.context(), ["ctx".to_string()]);
        assert_eq!(state.critique(), None);
    }

    #[tokio::test]
    async fn draft_failure_propagates() {
        let provider = Arc::new(ScriptedProvider::new(vec!["v1"]).failing_on(1));
        let generator = Generator::new(provider, "m");

        let err = draft_step(&generator, RevisionState::new("q", vec![])).await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }
}
