use std::sync::Arc;

use tracing::{debug, warn};

use crate::assistant::Assistant;
use crate::errors::AppError;
use crate::session::state::{AiSlot, Review, SessionSnapshot};
use crate::session::{require_selection, SessionController};

#[derive(Debug, Clone, Copy)]
enum ReviewKind {
    Feedback,
    Analysis,
}

impl SessionController {
    fn require_assistant(&self) -> Result<Arc<dyn Assistant>, AppError> {
        self.assistant.clone().ok_or(AppError::AiUnavailable)
    }

    /// Asks the assistant for values for one field and caches them in that
    /// field's slot. Results are dropped if the selection changed meanwhile.
    pub async fn request_suggestions(&self, field_id: &str) -> Result<SessionSnapshot, AppError> {
        let assistant = self.require_assistant()?;

        let (ticket, request, label, framework_name, current_value) = {
            let mut state = self.state.lock().await;
            let framework_id = require_selection(&state)?.to_string();
            let locale = self
                .catalog
                .get(&framework_id)
                .and_then(|f| f.locale(state.language))
                .ok_or_else(|| {
                    AppError::Integrity(format!("Framework '{framework_id}' is unavailable"))
                })?;
            let field = locale
                .field(field_id)
                .ok_or_else(|| AppError::NotFound(format!("Field '{field_id}' not found")))?;
            let current_value = state
                .components
                .iter()
                .find(|c| c.id == field_id)
                .map(|c| c.value.clone())
                .unwrap_or_default();

            let label = field.label.clone();
            let framework_name = locale.name.clone();
            let request = state.next_request();
            state
                .ai
                .suggestions
                .insert(field_id.to_string(), AiSlot::pending(request));
            self.publish(&state);
            (state.selection_epoch, request, label, framework_name, current_value)
        };

        let result = assistant
            .suggest_field_values(&label, &framework_name, &current_value)
            .await;

        let mut state = self.state.lock().await;
        if state.selection_epoch != ticket {
            debug!("Dropping suggestions for '{field_id}': selection changed");
            if state
                .ai
                .suggestions
                .get(field_id)
                .is_some_and(|slot| slot.awaits(request))
            {
                state.ai.suggestions.remove(field_id);
            }
            return Ok(self.publish(&state));
        }

        let slot = match &result {
            Ok(values) => AiSlot::ready(values.clone()),
            Err(e) => {
                warn!("Suggestions for '{field_id}' failed: {e}");
                AiSlot::failed(e.to_string())
            }
        };
        state.ai.suggestions.insert(field_id.to_string(), slot);
        let snapshot = self.publish(&state);
        result.map(|_| snapshot)
    }

    pub async fn request_feedback(&self) -> Result<SessionSnapshot, AppError> {
        self.request_review(ReviewKind::Feedback).await
    }

    pub async fn request_analysis(&self) -> Result<SessionSnapshot, AppError> {
        self.request_review(ReviewKind::Analysis).await
    }

    async fn request_review(&self, kind: ReviewKind) -> Result<SessionSnapshot, AppError> {
        let assistant = self.require_assistant()?;

        let (ticket, request, prompt) = {
            let mut state = self.state.lock().await;
            require_selection(&state)?;
            if state.prompt.copy_prompt.trim().is_empty() {
                return Err(AppError::Validation(
                    "Fill in the prompt before asking for a review".to_string(),
                ));
            }
            let prompt = state.prompt.copy_prompt.clone();
            let request = state.next_request();
            *review_slot(&mut state.ai, kind) = AiSlot::pending(request);
            self.publish(&state);
            (state.content_epoch, request, prompt)
        };

        let result = match kind {
            ReviewKind::Feedback => assistant.get_feedback(&prompt).await,
            ReviewKind::Analysis => assistant.get_detailed_analysis(&prompt).await,
        };

        let mut state = self.state.lock().await;
        if state.content_epoch != ticket {
            debug!("Dropping {kind:?}: prompt changed while it was pending");
            let slot = review_slot(&mut state.ai, kind);
            if slot.awaits(request) {
                *slot = AiSlot::default();
            }
            return Ok(self.publish(&state));
        }

        let slot = match &result {
            Ok(text) => AiSlot::ready(Review::new(text.clone())),
            Err(e) => {
                warn!("{kind:?} request failed: {e}");
                AiSlot::failed(e.to_string())
            }
        };
        *review_slot(&mut state.ai, kind) = slot;
        let snapshot = self.publish(&state);
        result.map(|_| snapshot)
    }
}

fn review_slot(ai: &mut crate::session::state::AiResults, kind: ReviewKind) -> &mut AiSlot<Review> {
    match kind {
        ReviewKind::Feedback => &mut ai.feedback,
        ReviewKind::Analysis => &mut ai.analysis,
    }
}
