//! AI collaborator contract consumed by the session controller.
//!
//! The controller holds an `Option<Arc<dyn Assistant>>`: `None` means the AI
//! capabilities are unavailable, all of them together. `ClaudeAssistant` is the
//! production backend built on `LlmClient`.

pub mod prompts;
pub mod sections;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::assistant::prompts::{
    ANALYSIS_PROMPT, FEEDBACK_PROMPT, SUGGEST_PROMPT, SUGGEST_SYSTEM, TRANSLATE_PROMPT,
    TRANSLATE_SYSTEM,
};
use crate::errors::AppError;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, PLAIN_TEXT_ONLY, PROMPT_COACH_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::prompt::Language;

const MAX_SUGGESTIONS: usize = 5;

#[async_trait]
pub trait Assistant: Send + Sync {
    /// Candidate values for one field. An empty list is a valid answer.
    async fn suggest_field_values(
        &self,
        field_label: &str,
        framework_name: &str,
        current_value: &str,
    ) -> Result<Vec<String>, AppError>;

    async fn get_feedback(&self, prompt: &str) -> Result<String, AppError>;

    async fn get_detailed_analysis(&self, prompt: &str) -> Result<String, AppError>;

    /// Callers never ask for `from == to`.
    async fn translate(&self, text: &str, from: Language, to: Language)
        -> Result<String, AppError>;
}

/// The model may answer with the documented object or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SuggestionPayload {
    Wrapped { suggestions: Vec<String> },
    Bare(Vec<String>),
}

impl SuggestionPayload {
    fn into_values(self) -> Vec<String> {
        let raw = match self {
            SuggestionPayload::Wrapped { suggestions } => suggestions,
            SuggestionPayload::Bare(values) => values,
        };
        let mut values: Vec<String> = Vec::with_capacity(raw.len());
        for value in raw {
            let value = value.trim();
            if !value.is_empty() && !values.iter().any(|v| v == value) {
                values.push(value.to_string());
            }
        }
        values.truncate(MAX_SUGGESTIONS);
        values
    }
}

pub struct ClaudeAssistant {
    llm: LlmClient,
}

impl ClaudeAssistant {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Assistant for ClaudeAssistant {
    async fn suggest_field_values(
        &self,
        field_label: &str,
        framework_name: &str,
        current_value: &str,
    ) -> Result<Vec<String>, AppError> {
        let prompt = SUGGEST_PROMPT
            .replace("{framework_name}", framework_name)
            .replace("{field_label}", field_label)
            .replace("{current_value}", current_value.trim());
        let system = format!("{SUGGEST_SYSTEM} {JSON_ONLY_SYSTEM}");
        let payload: SuggestionPayload = self
            .llm
            .call_json(&prompt, &system)
            .await
            .map_err(|e| AppError::Llm(format!("Suggestion request failed: {e}")))?;
        let values = payload.into_values();
        debug!("{} suggestions for field '{field_label}'", values.len());
        Ok(values)
    }

    async fn get_feedback(&self, prompt: &str) -> Result<String, AppError> {
        let request = FEEDBACK_PROMPT.replace("{prompt}", prompt);
        self.llm
            .call_text(&request, PROMPT_COACH_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Feedback request failed: {e}")))
    }

    async fn get_detailed_analysis(&self, prompt: &str) -> Result<String, AppError> {
        let request = ANALYSIS_PROMPT.replace("{prompt}", prompt);
        self.llm
            .call_text(&request, PROMPT_COACH_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Analysis request failed: {e}")))
    }

    async fn translate(
        &self,
        text: &str,
        from: Language,
        to: Language,
    ) -> Result<String, AppError> {
        let request = TRANSLATE_PROMPT
            .replace("{from}", from.english_name())
            .replace("{to}", to.english_name())
            .replace("{text}", text);
        let system = format!("{TRANSLATE_SYSTEM} {PLAIN_TEXT_ONLY}");
        self.llm
            .call_text(&request, &system)
            .await
            .map_err(|e| AppError::Llm(format!("Translation failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_payload() {
        let payload: SuggestionPayload =
            serde_json::from_str(r#"{"suggestions": [" A ", "B", "A", ""]}"#).unwrap();
        assert_eq!(payload.into_values(), vec!["A", "B"]);
    }

    #[test]
    fn test_bare_payload_is_truncated() {
        let payload: SuggestionPayload =
            serde_json::from_str(r#"["1", "2", "3", "4", "5", "6", "7"]"#).unwrap();
        assert_eq!(payload.into_values().len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_empty_payload_is_valid() {
        let payload: SuggestionPayload = serde_json::from_str(r#"{"suggestions": []}"#).unwrap();
        assert!(payload.into_values().is_empty());
    }

    #[test]
    fn test_suggest_prompt_substitution() {
        let prompt = SUGGEST_PROMPT
            .replace("{framework_name}", "RTF")
            .replace("{field_label}", "Role")
            .replace("{current_value}", "");
        assert!(prompt.contains("\"RTF\""));
        assert!(prompt.contains("FIELD: Role"));
        assert!(!prompt.contains("{field_label}"));
    }
}
