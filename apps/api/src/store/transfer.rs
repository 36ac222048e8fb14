//! Export/import document format.
//!
//! The interchange file is a JSON array of saved-prompt objects with camelCase
//! keys. On import only `name`, `generatedPrompt` and `promptToCopy` are
//! required; the other fields fall back to defaults and unknown keys are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::prompt::{Category, Language, PromptComponent};
use crate::models::saved_prompt::NewSavedPrompt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub imported: usize,
    pub ids: Vec<i64>,
    pub skipped: Vec<SkippedRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportRecord {
    name: String,
    generated_prompt: String,
    prompt_to_copy: String,
    #[serde(default)]
    framework_id: String,
    #[serde(default)]
    category: Category,
    #[serde(default)]
    components: Vec<PromptComponent>,
    #[serde(default)]
    free_text: String,
    #[serde(default)]
    language: Language,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

impl From<ImportRecord> for NewSavedPrompt {
    fn from(record: ImportRecord) -> Self {
        let display_name = record
            .display_name
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| record.name.clone());
        NewSavedPrompt {
            name: record.name,
            framework_id: record.framework_id,
            category: record.category,
            components: record.components,
            free_text: record.free_text,
            generated_prompt: record.generated_prompt,
            prompt_to_copy: record.prompt_to_copy,
            language: record.language,
            display_name,
            notes: record.notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

/// Splits an import document into insertable prompts and skipped records.
/// Only a document that is not a JSON array fails as a whole.
pub fn parse_import(raw: &str) -> Result<(Vec<NewSavedPrompt>, Vec<SkippedRecord>), AppError> {
    let document: Value = serde_json::from_str(raw)?;
    let Value::Array(items) = document else {
        return Err(AppError::Validation(
            "Import file must contain a JSON array of prompts".to_string(),
        ));
    };

    let mut records = Vec::with_capacity(items.len());
    let mut skipped = Vec::new();

    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<ImportRecord>(item) {
            Ok(record) if record.name.trim().is_empty() => skipped.push(SkippedRecord {
                index,
                reason: "name is empty".to_string(),
            }),
            Ok(record) => records.push(record.into()),
            Err(e) => skipped.push(SkippedRecord {
                index,
                reason: e.to_string(),
            }),
        }
    }

    Ok((records, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_notes_are_dropped() {
        let raw = r#"[{"name": "N", "generatedPrompt": "G", "promptToCopy": "C", "notes": "  "}]"#;
        let (records, _) = parse_import(raw).unwrap();
        assert!(records[0].notes.is_none());
    }

    #[test]
    fn test_minimal_record_gets_defaults() {
        let raw = r#"[{"name": "Mini", "generatedPrompt": "G", "promptToCopy": "C"}]"#;
        let (records, skipped) = parse_import(raw).unwrap();
        assert!(skipped.is_empty());
        let r = &records[0];
        assert_eq!(r.framework_id, "");
        assert_eq!(r.category, Category::Text);
        assert_eq!(r.language, Language::En);
        assert_eq!(r.display_name, "Mini");
        assert_eq!(r.free_text, "");
        assert!(r.components.is_empty());
        assert!(r.notes.is_none());
    }

    #[test]
    fn test_missing_generated_prompt_is_skipped() {
        let raw = r#"[
            {"name": "Ok", "generatedPrompt": "G", "promptToCopy": "C"},
            {"name": "Bad", "promptToCopy": "C"}
        ]"#;
        let (records, skipped) = parse_import(raw).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].index, 1);
        assert!(skipped[0].reason.contains("generatedPrompt"));
    }

    #[test]
    fn test_blank_name_and_non_object_are_skipped() {
        let raw = r#"[{"name": " ", "generatedPrompt": "G", "promptToCopy": "C"}, 42]"#;
        let (records, skipped) = parse_import(raw).unwrap();
        assert!(records.is_empty());
        assert_eq!(
            skipped.iter().map(|s| s.index).collect::<Vec<_>>(),
            vec![0, 1]
        );
    }

    #[test]
    fn test_full_record_keeps_fields_and_ignores_unknown() {
        let raw = r#"[{
            "id": 12, "timestamp": "2025-01-01T00:00:00Z", "name": "Full",
            "frameworkId": "midjourney", "category": "media",
            "components": [{"id": "subject", "value": "Fox"}],
            "freeText": "more", "generatedPrompt": "Fox\n\nmore", "promptToCopy": "Fox more",
            "language": "es", "displayName": "Midjourney", "notes": "n", "favorite": true
        }]"#;
        let (records, _) = parse_import(raw).unwrap();
        let r = &records[0];
        assert_eq!(r.framework_id, "midjourney");
        assert_eq!(r.category, Category::Media);
        assert_eq!(r.language, Language::Es);
        assert_eq!(r.display_name, "Midjourney");
        assert_eq!(r.components[0].value, "Fox");
        assert_eq!(r.notes.as_deref(), Some("n"));
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        assert!(matches!(
            parse_import("[not json").unwrap_err(),
            AppError::Serialization(_)
        ));
    }
}
