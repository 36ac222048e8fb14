//! Framework Catalog: the read-only registry of prompt frameworks.
//!
//! The built-in catalog is embedded as JSON and parsed once at startup.
//! `CATALOG_PATH` can point at a replacement file with the same shape.
//! Loading validates the invariants the session controller relies on:
//! every framework is localized into every language, and the field ids of a
//! framework are identical (same ids, same order) across languages.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::prompt::{Category, Language};

const BUILTIN_FRAMEWORKS: &str = include_str!("frameworks.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog contains no frameworks")]
    Empty,

    #[error("Duplicate framework id '{0}'")]
    DuplicateFramework(String),

    #[error("Framework '{framework}' is missing the '{language}' locale")]
    MissingLocale {
        framework: String,
        language: Language,
    },

    #[error("Framework '{framework}' declares field '{field}' twice")]
    DuplicateField { framework: String, field: String },

    #[error("Framework '{0}' has different field ids across languages")]
    FieldMismatch(String),

    #[error("Framework '{0}' has different categories across languages")]
    CategoryMismatch(String),

    #[error("Framework '{framework}' names unknown main field '{field}'")]
    UnknownMainField { framework: String, field: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkLocale {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub components: Vec<FieldDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_links: Vec<Link>,
    /// Set on "main + parameters" frameworks (e.g. image prompts with flag fields).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_field: Option<String>,
}

impl FrameworkLocale {
    pub fn field(&self, field_id: &str) -> Option<&FieldDef> {
        self.components.iter().find(|f| f.id == field_id)
    }

    pub fn field_ids(&self) -> Vec<&str> {
        self.components.iter().map(|f| f.id.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Framework {
    pub id: String,
    pub localized: HashMap<Language, FrameworkLocale>,
}

impl Framework {
    pub fn locale(&self, language: Language) -> Option<&FrameworkLocale> {
        self.localized.get(&language)
    }

    /// Category is identical across locales (checked at load).
    pub fn category(&self) -> Category {
        Language::ALL
            .iter()
            .find_map(|l| self.localized.get(l))
            .map(|l| l.category)
            .unwrap_or_default()
    }

    fn matches_query(&self, query: &str) -> bool {
        if self.id.to_lowercase().contains(query) {
            return true;
        }
        self.localized.values().any(|l| {
            l.name.to_lowercase().contains(query) || l.description.to_lowercase().contains(query)
        })
    }
}

/// Immutable registry of frameworks, shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Catalog {
    frameworks: Vec<Framework>,
}

impl Catalog {
    /// Parses the catalog embedded in the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_FRAMEWORKS)
    }

    pub async fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let catalog = Self::from_json(&raw)?;
        info!(
            "Loaded {} frameworks from {}",
            catalog.frameworks.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let frameworks: Vec<Framework> = serde_json::from_str(raw)?;
        Self::new(frameworks)
    }

    pub fn new(frameworks: Vec<Framework>) -> Result<Self, CatalogError> {
        if frameworks.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for framework in &frameworks {
            if !seen.insert(framework.id.as_str()) {
                return Err(CatalogError::DuplicateFramework(framework.id.clone()));
            }
            validate_framework(framework)?;
        }
        Ok(Self { frameworks })
    }

    pub fn list(&self) -> &[Framework] {
        &self.frameworks
    }

    pub fn get(&self, id: &str) -> Option<&Framework> {
        self.frameworks.iter().find(|f| f.id == id)
    }

    /// Frameworks of `category` whose id, name or description contains `query`
    /// (case-insensitive, any language). A blank query matches everything.
    pub fn visible<'a>(&'a self, category: Category, query: &str) -> Vec<&'a Framework> {
        let query = query.trim().to_lowercase();
        self.frameworks
            .iter()
            .filter(|f| f.category() == category)
            .filter(|f| query.is_empty() || f.matches_query(&query))
            .collect()
    }
}

fn validate_framework(framework: &Framework) -> Result<(), CatalogError> {
    let mut reference: Option<(Vec<&str>, Category)> = None;

    for language in Language::ALL {
        let locale = framework
            .locale(language)
            .ok_or_else(|| CatalogError::MissingLocale {
                framework: framework.id.clone(),
                language,
            })?;

        let mut ids = HashSet::new();
        for field in &locale.components {
            if !ids.insert(field.id.as_str()) {
                return Err(CatalogError::DuplicateField {
                    framework: framework.id.clone(),
                    field: field.id.clone(),
                });
            }
        }

        if let Some(main) = &locale.main_field {
            if locale.field(main).is_none() {
                return Err(CatalogError::UnknownMainField {
                    framework: framework.id.clone(),
                    field: main.clone(),
                });
            }
        }

        let field_ids = locale.field_ids();
        match &reference {
            None => reference = Some((field_ids, locale.category)),
            Some((ref_ids, ref_category)) => {
                if *ref_ids != field_ids {
                    return Err(CatalogError::FieldMismatch(framework.id.clone()));
                }
                if *ref_category != locale.category {
                    return Err(CatalogError::CategoryMismatch(framework.id.clone()));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn builtin() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = builtin();
        assert!(catalog.list().len() >= 5);
        let rtf = catalog.get("rtf").unwrap();
        assert_eq!(rtf.category(), Category::Text);
        assert_eq!(
            rtf.locale(Language::En).unwrap().field_ids(),
            vec!["role", "task", "format"]
        );
    }

    #[test]
    fn test_field_ids_stable_across_languages() {
        let catalog = builtin();
        for framework in catalog.list() {
            let en = framework.locale(Language::En).unwrap().field_ids();
            let es = framework.locale(Language::Es).unwrap().field_ids();
            assert_eq!(en, es, "field ids differ for {}", framework.id);
        }
    }

    #[test]
    fn test_midjourney_has_main_field() {
        let catalog = builtin();
        let mj = catalog.get("midjourney").unwrap();
        assert_eq!(
            mj.locale(Language::En).unwrap().main_field.as_deref(),
            Some("subject")
        );
        assert_eq!(mj.category(), Category::Media);
    }

    #[test]
    fn test_visible_filters_by_category_and_query() {
        let catalog = builtin();
        let text: Vec<_> = catalog
            .visible(Category::Text, "")
            .iter()
            .map(|f| f.id.as_str())
            .collect();
        assert!(text.contains(&"rtf"));
        assert!(!text.contains(&"midjourney"));

        let filtered = catalog.visible(Category::Text, "  ROLE, task ");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "rtf");

        // Spanish description also matches.
        let spanish = catalog.visible(Category::Music, "canción");
        assert_eq!(spanish.len(), 1);
    }

    #[test]
    fn test_missing_locale_rejected() {
        let raw = r#"[{"id": "x", "localized": {"en": {
            "name": "X", "description": "", "category": "text",
            "components": [{"id": "a", "label": "A"}]}}}]"#;
        let err = Catalog::from_json(raw).unwrap_err();
        assert!(matches!(err, CatalogError::MissingLocale { .. }));
    }

    #[test]
    fn test_field_mismatch_rejected() {
        let raw = r#"[{"id": "x", "localized": {
            "en": {"name": "X", "description": "", "category": "text",
                   "components": [{"id": "a", "label": "A"}, {"id": "b", "label": "B"}]},
            "es": {"name": "X", "description": "", "category": "text",
                   "components": [{"id": "b", "label": "B"}, {"id": "a", "label": "A"}]}}}]"#;
        let err = Catalog::from_json(raw).unwrap_err();
        assert!(matches!(err, CatalogError::FieldMismatch(_)));
    }

    #[test]
    fn test_unknown_main_field_rejected() {
        let raw = r#"[{"id": "x", "localized": {
            "en": {"name": "X", "description": "", "category": "media", "mainField": "zzz",
                   "components": [{"id": "a", "label": "A"}]},
            "es": {"name": "X", "description": "", "category": "media", "mainField": "zzz",
                   "components": [{"id": "a", "label": "A"}]}}}]"#;
        let err = Catalog::from_json(raw).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownMainField { .. }));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(
            Catalog::from_json("[]").unwrap_err(),
            CatalogError::Empty
        ));
    }
}
