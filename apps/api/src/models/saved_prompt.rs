use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::errors::AppError;
use crate::models::prompt::{Category, Language, PromptComponent};

/// A durable snapshot of a session. Field names are the export/import contract
/// and must stay stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPrompt {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub framework_id: String,
    pub category: Category,
    pub components: Vec<PromptComponent>,
    pub free_text: String,
    pub generated_prompt: String,
    pub prompt_to_copy: String,
    pub language: Language,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A saved prompt before the store assigns `id` and `timestamp`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSavedPrompt {
    pub name: String,
    pub framework_id: String,
    pub category: Category,
    pub components: Vec<PromptComponent>,
    pub free_text: String,
    pub generated_prompt: String,
    pub prompt_to_copy: String,
    pub language: Language,
    pub display_name: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SavedPromptRow {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub framework_id: String,
    pub category: String,
    pub components: Json<Vec<PromptComponent>>,
    pub free_text: String,
    pub generated_prompt: String,
    pub prompt_to_copy: String,
    pub language: String,
    pub display_name: String,
    pub notes: Option<String>,
}

impl TryFrom<SavedPromptRow> for SavedPrompt {
    type Error = AppError;

    fn try_from(row: SavedPromptRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse::<Category>()
            .map_err(|e| AppError::Integrity(format!("saved prompt {}: {e}", row.id)))?;
        let language = row
            .language
            .parse::<Language>()
            .map_err(|e| AppError::Integrity(format!("saved prompt {}: {e}", row.id)))?;

        Ok(SavedPrompt {
            id: row.id,
            timestamp: row.timestamp,
            name: row.name,
            framework_id: row.framework_id,
            category,
            components: row.components.0,
            free_text: row.free_text,
            generated_prompt: row.generated_prompt,
            prompt_to_copy: row.prompt_to_copy,
            language,
            display_name: row.display_name,
            notes: row.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(category: &str, language: &str) -> SavedPromptRow {
        SavedPromptRow {
            id: 7,
            timestamp: Utc::now(),
            name: "Campaign1".to_string(),
            framework_id: "rtf".to_string(),
            category: category.to_string(),
            components: Json(vec![PromptComponent {
                id: "role".to_string(),
                value: "Editor".to_string(),
            }]),
            free_text: String::new(),
            generated_prompt: "Editor".to_string(),
            prompt_to_copy: "Editor".to_string(),
            language: language.to_string(),
            display_name: "RTF".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_row_converts_to_saved_prompt() {
        let saved = SavedPrompt::try_from(row("text", "es")).unwrap();
        assert_eq!(saved.category, Category::Text);
        assert_eq!(saved.language, Language::Es);
        assert_eq!(saved.components.len(), 1);
    }

    #[test]
    fn test_row_with_unknown_category_is_integrity_error() {
        let err = SavedPrompt::try_from(row("poetry", "en")).unwrap_err();
        assert!(matches!(err, AppError::Integrity(_)));
    }

    #[test]
    fn test_saved_prompt_serializes_camel_case() {
        let saved = SavedPrompt::try_from(row("text", "en")).unwrap();
        let value = serde_json::to_value(&saved).unwrap();
        assert_eq!(value["frameworkId"], "rtf");
        assert_eq!(value["promptToCopy"], "Editor");
        assert_eq!(value["generatedPrompt"], "Editor");
        assert!(value.get("notes").is_none());
    }
}
