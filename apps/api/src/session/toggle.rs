use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::assistant::Assistant;
use crate::errors::AppError;
use crate::models::prompt::{Language, PromptComponent};
use crate::session::remap::remap_components;
use crate::session::SessionController;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// The language was switched. `translated` is false when values were
    /// carried over untranslated.
    Switched {
        language: Language,
        translated: bool,
        #[serde(rename = "translationError")]
        translation_error: bool,
    },
    /// A newer command changed the session while translations were pending;
    /// their results were discarded and nothing changed.
    Superseded,
}

/// Values captured under the lock and translated without it.
struct TranslationBatch {
    from: Language,
    to: Language,
    components: Vec<PromptComponent>,
    free_text: String,
    goal: String,
}

struct TranslatedBatch {
    components: Vec<PromptComponent>,
    free_text: String,
    goal: String,
    failed: usize,
}

impl TranslationBatch {
    /// One concurrent request per non-empty text. A failed request keeps the
    /// original text and is counted; it never fails the batch.
    async fn run(self, assistant: &dyn Assistant) -> TranslatedBatch {
        let (from, to) = (self.from, self.to);
        let texts: Vec<&str> = self
            .components
            .iter()
            .map(|c| c.value.as_str())
            .chain([self.free_text.as_str(), self.goal.as_str()])
            .collect();

        let results = join_all(texts.iter().map(|text| async move {
            if text.trim().is_empty() {
                return Ok(None);
            }
            assistant.translate(text, from, to).await.map(Some)
        }))
        .await;

        let mut failed = 0;
        let mut translated: Vec<String> = Vec::with_capacity(results.len());
        for (original, result) in texts.iter().zip(results) {
            match result {
                Ok(Some(text)) => translated.push(text),
                Ok(None) => translated.push(original.to_string()),
                Err(e) => {
                    warn!("Translation {from}->{to} failed, keeping original text: {e}");
                    failed += 1;
                    translated.push(original.to_string());
                }
            }
        }

        let goal = translated.pop().unwrap_or_default();
        let free_text = translated.pop().unwrap_or_default();
        let components = self
            .components
            .iter()
            .zip(translated)
            .map(|(c, value)| PromptComponent {
                id: c.id.clone(),
                value,
            })
            .collect();

        TranslatedBatch {
            components,
            free_text,
            goal,
            failed,
        }
    }
}

impl SessionController {
    /// Switches between the two languages while keeping the user's input.
    ///
    /// Values move onto the other locale's fields by id. With an assistant,
    /// every non-empty value, the free text and the goal are translated
    /// concurrently and the switch is committed only once the whole batch has
    /// settled, and only if no other command changed the session meanwhile.
    pub async fn toggle_language(&self) -> Result<ToggleOutcome, AppError> {
        let (ticket, batch, assistant) = {
            let mut state = self.state.lock().await;
            let from = state.language;
            let to = from.other();

            let Some(framework_id) = state.framework_id.clone() else {
                state.language = to;
                state.bump_selection();
                self.derive(&mut state);
                self.publish(&state);
                return Ok(ToggleOutcome::Switched {
                    language: to,
                    translated: false,
                    translation_error: false,
                });
            };

            let framework = self.catalog.get(&framework_id).ok_or_else(|| {
                AppError::Integrity(format!("Framework '{framework_id}' no longer exists"))
            })?;
            let locale = framework.locale(to).ok_or_else(|| {
                AppError::Integrity(format!("Framework '{framework_id}' has no '{to}' locale"))
            })?;
            let components = remap_components(&state.components, &locale.components);

            let Some(assistant) = self.assistant.clone() else {
                state.components = components;
                state.language = to;
                state.copied = false;
                state.translation_error = false;
                state.ai = Default::default();
                state.bump_selection();
                self.derive(&mut state);
                self.publish(&state);
                info!("Switched language {from}->{to} without translation");
                return Ok(ToggleOutcome::Switched {
                    language: to,
                    translated: false,
                    translation_error: false,
                });
            };

            // Pending assistant results describe the old language.
            state.ai = Default::default();
            state.bump_selection();
            state.translating = true;
            let ticket = state.toggle_epoch;
            self.publish(&state);

            let batch = TranslationBatch {
                from,
                to,
                components,
                free_text: state.free_text.clone(),
                goal: state.goal.clone(),
            };
            (ticket, batch, assistant)
        };

        let to = batch.to;
        let translated = batch.run(assistant.as_ref()).await;

        let mut state = self.state.lock().await;
        if state.toggle_epoch != ticket {
            info!("Discarding stale translation batch for {to}");
            return Ok(ToggleOutcome::Superseded);
        }

        let translation_error = translated.failed > 0;
        state.components = translated.components;
        state.free_text = translated.free_text;
        state.goal = translated.goal;
        state.language = to;
        state.translating = false;
        state.translation_error = translation_error;
        state.copied = false;
        state.ai = Default::default();
        state.bump_selection();
        self.derive(&mut state);
        self.publish(&state);

        info!(
            "Switched language to {to} ({} translation failures)",
            translated.failed
        );
        Ok(ToggleOutcome::Switched {
            language: to,
            translated: true,
            translation_error,
        })
    }
}
