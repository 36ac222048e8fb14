//! Session Controller: owns the live prompt session and runs every user command.
//!
//! Each command is one async method returning `Result<_, AppError>`. State sits
//! behind a `tokio::sync::Mutex` that is never held across an assistant call;
//! commands that wait on the assistant re-lock afterwards and commit only if
//! the relevant epoch has not moved. Every committed change is published as a
//! `SessionSnapshot` on a `watch` channel.

mod ai;
pub mod handlers;
pub mod remap;
pub mod state;
mod toggle;

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};

use crate::assembly::{assemble, is_pristine, AssembledPrompt, AssemblyInput};
use crate::assistant::Assistant;
use crate::catalog::Catalog;
use crate::errors::AppError;
use crate::models::prompt::{Category, Language, PromptComponent};
use crate::models::saved_prompt::{NewSavedPrompt, SavedPrompt};
use crate::session::remap::remap_components;
use crate::session::state::{SessionSnapshot, SessionState};
use crate::store::transfer::ImportReport;
use crate::store::PromptStore;

pub use toggle::ToggleOutcome;

/// Catalog entry as listed for the active language.
#[derive(Debug, Clone, Serialize)]
pub struct FrameworkSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
}

pub struct SessionController {
    catalog: Arc<Catalog>,
    store: PromptStore,
    assistant: Option<Arc<dyn Assistant>>,
    state: Mutex<SessionState>,
    updates: watch::Sender<SessionSnapshot>,
}

impl SessionController {
    pub fn new(
        catalog: Arc<Catalog>,
        store: PromptStore,
        assistant: Option<Arc<dyn Assistant>>,
        language: Language,
    ) -> Self {
        let state = SessionState::new(language, assistant.is_some());
        let (updates, _) = watch::channel(state.snapshot(&catalog, assistant.is_some()));
        Self {
            catalog,
            store,
            assistant,
            state: Mutex::new(state),
            updates,
        }
    }

    pub fn ai_available(&self) -> bool {
        self.assistant.is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.updates.borrow().clone()
    }

    /// Frameworks of the current category matching the current search filter.
    pub async fn visible_frameworks(&self) -> Vec<FrameworkSummary> {
        let state = self.state.lock().await;
        self.frameworks_for(state.category, &state.search, state.language)
    }

    pub fn frameworks_for(
        &self,
        category: Category,
        query: &str,
        language: Language,
    ) -> Vec<FrameworkSummary> {
        self.catalog
            .visible(category, query)
            .into_iter()
            .filter_map(|f| {
                let locale = f.locale(language)?;
                Some(FrameworkSummary {
                    id: f.id.clone(),
                    name: locale.name.clone(),
                    description: locale.description.clone(),
                    category: locale.category,
                })
            })
            .collect()
    }

    // ── Selection ─────────────────────────────────────────────────────

    pub async fn select_framework(&self, framework_id: &str) -> Result<SessionSnapshot, AppError> {
        let framework = self
            .catalog
            .get(framework_id)
            .ok_or_else(|| AppError::NotFound(format!("Framework '{framework_id}' not found")))?;

        let mut state = self.state.lock().await;
        let locale = framework.locale(state.language).ok_or_else(|| {
            AppError::Integrity(format!(
                "Framework '{framework_id}' has no '{}' locale",
                state.language
            ))
        })?;

        state.clear_selection();
        state.framework_id = Some(framework.id.clone());
        state.category = framework.category();
        state.components = locale
            .components
            .iter()
            .map(|f| PromptComponent::empty(f.id.clone()))
            .collect();
        self.derive(&mut state);

        info!("Selected framework '{framework_id}'");
        Ok(self.publish(&state))
    }

    /// Switching to another category, or re-selecting while a search filter is
    /// active, drops the selection. The same category with no filter is a no-op.
    pub async fn select_category(&self, category: Category) -> Result<SessionSnapshot, AppError> {
        let mut state = self.state.lock().await;
        if category == state.category && state.search.trim().is_empty() {
            return Ok(self.publish(&state));
        }

        state.clear_selection();
        state.category = category;
        state.search.clear();
        self.derive(&mut state);
        Ok(self.publish(&state))
    }

    pub async fn set_search(&self, query: &str) -> Result<SessionSnapshot, AppError> {
        let mut state = self.state.lock().await;
        state.search = query.to_string();
        Ok(self.publish(&state))
    }

    // ── Content edits ─────────────────────────────────────────────────

    pub async fn update_field(&self, field_id: &str, value: &str) -> Result<SessionSnapshot, AppError> {
        let mut state = self.state.lock().await;
        require_selection(&state)?;

        let component = state
            .components
            .iter_mut()
            .find(|c| c.id == field_id)
            .ok_or_else(|| AppError::NotFound(format!("Field '{field_id}' not found")))?;
        component.value = value.to_string();

        self.content_changed(&mut state);
        Ok(self.publish(&state))
    }

    pub async fn update_free_text(&self, value: &str) -> Result<SessionSnapshot, AppError> {
        let mut state = self.state.lock().await;
        require_selection(&state)?;
        state.free_text = value.to_string();
        self.content_changed(&mut state);
        Ok(self.publish(&state))
    }

    /// The goal is carried through language toggles but is not part of the
    /// prompt, so it only supersedes a pending toggle.
    pub async fn update_goal(&self, value: &str) -> Result<SessionSnapshot, AppError> {
        let mut state = self.state.lock().await;
        state.goal = value.to_string();
        state.supersede_toggle();
        Ok(self.publish(&state))
    }

    pub async fn reset_fields(&self) -> Result<SessionSnapshot, AppError> {
        let mut state = self.state.lock().await;
        require_selection(&state)?;
        for component in &mut state.components {
            component.value.clear();
        }
        state.free_text.clear();
        self.content_changed(&mut state);
        Ok(self.publish(&state))
    }

    /// Returns the clipboard text and records that it was copied.
    pub async fn mark_copied(&self) -> Result<String, AppError> {
        let mut state = self.state.lock().await;
        if state.prompt.copy_prompt.is_empty() {
            return Err(AppError::Validation("Nothing to copy yet".to_string()));
        }
        state.copied = true;
        let text = state.prompt.copy_prompt.clone();
        self.publish(&state);
        Ok(text)
    }

    // ── Persistence ───────────────────────────────────────────────────

    pub async fn save(
        &self,
        name: Option<&str>,
        notes: Option<&str>,
    ) -> Result<SavedPrompt, AppError> {
        let new_prompt = {
            let state = self.state.lock().await;
            let framework_id = require_selection(&state)?;
            if state.prompt.copy_prompt.trim().is_empty() {
                return Err(AppError::Validation(
                    "Nothing to save: the prompt is empty".to_string(),
                ));
            }

            let display_name = self
                .catalog
                .get(framework_id)
                .and_then(|f| f.locale(state.language))
                .map(|l| l.name.clone())
                .unwrap_or_else(|| framework_id.to_string());
            let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
                Some(n) => n.to_string(),
                None => format!("{display_name} {}", Utc::now().format("%Y-%m-%d %H:%M")),
            };

            NewSavedPrompt {
                name,
                framework_id: framework_id.to_string(),
                category: state.category,
                components: state.components.clone(),
                free_text: state.free_text.clone(),
                generated_prompt: state.prompt.display_prompt.clone(),
                prompt_to_copy: state.prompt.copy_prompt.clone(),
                language: state.language,
                display_name,
                notes: notes
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(String::from),
            }
        };

        let id = self.store.add(&new_prompt).await?;
        let saved = self
            .store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Saved prompt {id} not found")))?;

        let mut state = self.state.lock().await;
        state.loaded_prompt_id = Some(id);
        drop(state);
        self.refresh_saved_or_warn().await;

        Ok(saved)
    }

    /// Restores a saved session. The stored prompts are shown verbatim rather
    /// than recomputed, so later catalog edits do not alter saved output.
    pub async fn load(&self, id: i64) -> Result<SessionSnapshot, AppError> {
        let saved = self
            .store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Saved prompt {id} not found")))?;

        let framework = self.catalog.get(&saved.framework_id).ok_or_else(|| {
            warn!(
                "Saved prompt {id} references missing framework '{}'",
                saved.framework_id
            );
            AppError::Integrity(format!(
                "Framework '{}' used by '{}' no longer exists",
                saved.framework_id, saved.name
            ))
        })?;

        let mut state = self.state.lock().await;
        state.clear_selection();
        state.language = saved.language;
        state.framework_id = Some(framework.id.clone());

        match framework.locale(saved.language) {
            Some(locale) => {
                state.category = locale.category;
                state.components = remap_components(&saved.components, &locale.components);
            }
            None => {
                warn!(
                    "Framework '{}' has no '{}' locale; restoring raw components",
                    framework.id, saved.language
                );
                state.category = saved.category;
                state.components = saved.components.clone();
            }
        }
        state.free_text = saved.free_text.clone();
        state.search.clear();
        state.prompt = AssembledPrompt {
            display_prompt: saved.generated_prompt.clone(),
            copy_prompt: saved.prompt_to_copy.clone(),
            is_pristine: is_pristine(&state.components, &state.free_text),
        };
        state.loaded_prompt_id = Some(id);

        info!("Loaded saved prompt {id} ('{}')", saved.name);
        Ok(self.publish(&state))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let removed = self.store.delete(id).await?;

        let mut state = self.state.lock().await;
        if state.loaded_prompt_id == Some(id) {
            state.loaded_prompt_id = None;
        }
        drop(state);
        self.refresh_saved_or_warn().await;

        if !removed {
            return Err(AppError::NotFound(format!("Saved prompt {id} not found")));
        }
        Ok(())
    }

    pub async fn rename(&self, id: i64, name: &str) -> Result<SavedPrompt, AppError> {
        let renamed = self.store.rename(id, name).await?;
        self.refresh_saved_or_warn().await;
        Ok(renamed)
    }

    pub async fn update_notes(&self, id: i64, notes: Option<String>) -> Result<SavedPrompt, AppError> {
        let updated = self.store.update_notes(id, notes).await?;
        self.refresh_saved_or_warn().await;
        Ok(updated)
    }

    /// Reloads the in-memory list of saved prompts from the store.
    pub async fn refresh_saved(&self) -> Result<Vec<SavedPrompt>, AppError> {
        let saved = self.store.get_all().await?;
        let mut state = self.state.lock().await;
        state.saved = saved.clone();
        self.publish(&state);
        Ok(saved)
    }

    pub async fn export_json(&self) -> Result<String, AppError> {
        self.store.export_json().await
    }

    pub async fn import_json(&self, raw: &str) -> Result<ImportReport, AppError> {
        let report = self.store.import_json(raw).await?;
        self.refresh_saved_or_warn().await;
        Ok(report)
    }

    // ── Internals ─────────────────────────────────────────────────────

    /// The store write already succeeded; a failed list refresh only leaves the
    /// in-memory list stale.
    async fn refresh_saved_or_warn(&self) {
        if let Err(e) = self.refresh_saved().await {
            warn!("Failed to refresh saved prompts: {e}");
        }
    }

    fn content_changed(&self, state: &mut SessionState) {
        state.copied = false;
        state.ai.invalidate_reviews();
        state.bump_content();
        self.derive(state);
    }

    fn derive(&self, state: &mut SessionState) {
        let locale = state
            .framework_id
            .as_deref()
            .and_then(|id| self.catalog.get(id))
            .and_then(|f| f.locale(state.language));
        state.prompt = assemble(&AssemblyInput {
            locale,
            category: state.category,
            components: &state.components,
            free_text: &state.free_text,
            language: state.language,
            ai_available: self.ai_available(),
        });
    }

    fn publish(&self, state: &SessionState) -> SessionSnapshot {
        let snapshot = state.snapshot(&self.catalog, self.ai_available());
        self.updates.send_replace(snapshot.clone());
        snapshot
    }
}

fn require_selection(state: &SessionState) -> Result<&str, AppError> {
    state
        .framework_id
        .as_deref()
        .ok_or_else(|| AppError::Validation("No framework selected".to_string()))
}
