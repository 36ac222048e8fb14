use std::collections::BTreeMap;

use serde::Serialize;

use crate::assembly::placeholder::placeholder;
use crate::assembly::AssembledPrompt;
use crate::assistant::sections::{parse_sections, Section};
use crate::catalog::{Catalog, FieldDef, Framework, Link};
use crate::models::prompt::{Category, Language, PromptComponent};
use crate::models::saved_prompt::SavedPrompt;

/// One AI result slot. A failed call leaves its message here instead of
/// failing the session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSlot<T> {
    pub value: Option<T>,
    pub error: Option<String>,
    pub loading: bool,
    /// Request that owns a loading slot.
    #[serde(skip)]
    request: u64,
}

impl<T> Default for AiSlot<T> {
    fn default() -> Self {
        Self {
            value: None,
            error: None,
            loading: false,
            request: 0,
        }
    }
}

impl<T> AiSlot<T> {
    pub fn pending(request: u64) -> Self {
        Self {
            loading: true,
            request,
            ..Self::default()
        }
    }

    /// Whether `request` is the call this slot is still waiting for.
    pub fn awaits(&self, request: u64) -> bool {
        self.loading && self.request == request
    }

    pub fn ready(value: T) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }
}

/// Free-form feedback or analysis with its header-delimited sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub text: String,
    pub sections: Vec<Section>,
}

impl Review {
    pub fn new(text: String) -> Self {
        let sections = parse_sections(&text);
        Self { text, sections }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AiResults {
    pub suggestions: BTreeMap<String, AiSlot<Vec<String>>>,
    pub feedback: AiSlot<Review>,
    pub analysis: AiSlot<Review>,
}

impl AiResults {
    /// Drops results that describe content which has since changed.
    pub fn invalidate_reviews(&mut self) {
        self.feedback = AiSlot::default();
        self.analysis = AiSlot::default();
    }
}

/// The live session. Only `SessionController` mutates it.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub framework_id: Option<String>,
    pub category: Category,
    pub components: Vec<PromptComponent>,
    pub free_text: String,
    pub goal: String,
    pub language: Language,
    pub search: String,
    pub prompt: AssembledPrompt,
    pub copied: bool,
    pub ai: AiResults,
    pub translating: bool,
    pub translation_error: bool,
    pub saved: Vec<SavedPrompt>,
    pub loaded_prompt_id: Option<i64>,
    /// Bumped when the selected framework or language changes.
    pub selection_epoch: u64,
    /// Bumped on every change to the prompt content, including selection changes.
    pub content_epoch: u64,
    /// Bumped by everything a pending language toggle must not overwrite:
    /// content, selection and goal changes.
    pub toggle_epoch: u64,
    request_seq: u64,
}

impl SessionState {
    pub fn new(language: Language, ai_available: bool) -> Self {
        Self {
            framework_id: None,
            category: Category::default(),
            components: Vec::new(),
            free_text: String::new(),
            goal: String::new(),
            language,
            search: String::new(),
            prompt: AssembledPrompt {
                display_prompt: placeholder(language, ai_available).to_string(),
                copy_prompt: String::new(),
                is_pristine: true,
            },
            copied: false,
            ai: AiResults::default(),
            translating: false,
            translation_error: false,
            saved: Vec::new(),
            loaded_prompt_id: None,
            selection_epoch: 0,
            content_epoch: 0,
            toggle_epoch: 0,
            request_seq: 0,
        }
    }

    /// Any in-flight toggle batch becomes stale.
    pub fn supersede_toggle(&mut self) {
        self.toggle_epoch += 1;
        self.translating = false;
    }

    pub fn bump_content(&mut self) {
        self.content_epoch += 1;
        self.supersede_toggle();
    }

    pub fn bump_selection(&mut self) {
        self.selection_epoch += 1;
        self.bump_content();
    }

    /// Id for one assistant call, stored in the slot it fills.
    pub fn next_request(&mut self) -> u64 {
        self.request_seq += 1;
        self.request_seq
    }

    /// Back to `NoFrameworkSelected`.
    pub fn clear_selection(&mut self) {
        self.framework_id = None;
        self.components.clear();
        self.free_text.clear();
        self.copied = false;
        self.ai = AiResults::default();
        self.translation_error = false;
        self.loaded_prompt_id = None;
        self.bump_selection();
    }

    pub fn snapshot(&self, catalog: &Catalog, ai_available: bool) -> SessionSnapshot {
        let framework = self
            .framework_id
            .as_deref()
            .and_then(|id| catalog.get(id))
            .and_then(|f| FrameworkView::new(f, self.language));

        SessionSnapshot {
            language: self.language,
            category: self.category,
            search: self.search.clone(),
            framework,
            components: self.components.clone(),
            free_text: self.free_text.clone(),
            goal: self.goal.clone(),
            prompt: self.prompt.clone(),
            copied: self.copied,
            ai_available,
            ai: self.ai.clone(),
            translating: self.translating,
            translation_error: self.translation_error,
            saved: self.saved.clone(),
            loaded_prompt_id: self.loaded_prompt_id,
        }
    }
}

/// The selected framework as the active language presents it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub fields: Vec<FieldDef>,
    pub tool_links: Vec<Link>,
    pub main_field: Option<String>,
}

impl FrameworkView {
    pub fn new(framework: &Framework, language: Language) -> Option<Self> {
        let locale = framework.locale(language)?;
        Some(Self {
            id: framework.id.clone(),
            name: locale.name.clone(),
            description: locale.description.clone(),
            category: locale.category,
            fields: locale.components.clone(),
            tool_links: locale.tool_links.clone(),
            main_field: locale.main_field.clone(),
        })
    }
}

/// Read-only view published to observers after every committed change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub language: Language,
    pub category: Category,
    pub search: String,
    pub framework: Option<FrameworkView>,
    pub components: Vec<PromptComponent>,
    pub free_text: String,
    pub goal: String,
    pub prompt: AssembledPrompt,
    pub copied: bool,
    pub ai_available: bool,
    pub ai: AiResults,
    pub translating: bool,
    pub translation_error: bool,
    pub saved: Vec<SavedPrompt>,
    pub loaded_prompt_id: Option<i64>,
}
