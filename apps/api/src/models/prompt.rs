use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Languages a framework can be localized into. The session toggles between the two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Es];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }

    /// The language `toggle_language` switches to.
    pub fn other(&self) -> Language {
        match self {
            Language::En => Language::Es,
            Language::Es => Language::En,
        }
    }

    /// English name, used when instructing the translator.
    pub fn english_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Spanish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            other => Err(format!("unsupported language '{other}'")),
        }
    }
}

/// Framework category. Drives the copy-prompt join rule and the catalog tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Text,
    Media,
    Music,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Text => "text",
            Category::Media => "media",
            Category::Music => "music",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Category::Text),
            "media" => Ok(Category::Media),
            "music" => Ok(Category::Music),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

/// A single filled field of the active framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptComponent {
    pub id: String,
    pub value: String,
}

impl PromptComponent {
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: String::new(),
        }
    }

    /// Whitespace-only values count as empty everywhere.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_toggles_between_two() {
        assert_eq!(Language::En.other(), Language::Es);
        assert_eq!(Language::Es.other(), Language::En);
    }

    #[test]
    fn test_language_parse_is_case_insensitive() {
        assert_eq!("ES".parse::<Language>().unwrap(), Language::Es);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_category_serde_lowercase() {
        let json = serde_json::to_string(&Category::Music).unwrap();
        assert_eq!(json, r#""music""#);
        let parsed: Category = serde_json::from_str(r#""media""#).unwrap();
        assert_eq!(parsed, Category::Media);
    }

    #[test]
    fn test_whitespace_component_is_blank() {
        let c = PromptComponent {
            id: "role".to_string(),
            value: " \n\t".to_string(),
        };
        assert!(c.is_blank());
        assert!(PromptComponent::empty("task").is_blank());
    }
}
