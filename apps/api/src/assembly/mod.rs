//! Prompt Assembly Engine: a pure derivation from the selected framework,
//! the component values and the free text to the preview and clipboard prompts.
//!
//! Nothing here touches state or I/O. The session controller calls
//! [`assemble`] after every content change.

pub mod placeholder;

use serde::{Deserialize, Serialize};

use crate::catalog::FrameworkLocale;
use crate::models::prompt::{Category, Language, PromptComponent};

/// Separator between paragraphs of the display prompt.
const PARAGRAPH_SEPARATOR: &str = "\n\n";
const TEXT_SEPARATOR: &str = ", ";
const MEDIA_SEPARATOR: &str = " ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledPrompt {
    pub display_prompt: String,
    pub copy_prompt: String,
    pub is_pristine: bool,
}

/// Everything the derivation depends on.
///
/// `locale` is `None` when a stored session is shown with its raw components
/// because the framework's field list is unavailable; `category` then decides
/// the join rule on its own.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    pub locale: Option<&'a FrameworkLocale>,
    pub category: Category,
    pub components: &'a [PromptComponent],
    pub free_text: &'a str,
    pub language: Language,
    pub ai_available: bool,
}

/// How the copy prompt is flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CopyLayout<'a> {
    Joined(&'static str),
    MainWithParameters(&'a str),
}

impl<'a> CopyLayout<'a> {
    fn for_input(input: &AssemblyInput<'a>) -> Self {
        if let Some(main) = input.locale.and_then(|l| l.main_field.as_deref()) {
            return CopyLayout::MainWithParameters(main);
        }
        match input.category {
            Category::Text => CopyLayout::Joined(TEXT_SEPARATOR),
            Category::Media | Category::Music => CopyLayout::Joined(MEDIA_SEPARATOR),
        }
    }
}

pub fn is_pristine(components: &[PromptComponent], free_text: &str) -> bool {
    components.iter().all(PromptComponent::is_blank) && free_text.trim().is_empty()
}

/// Derives the display prompt, the copy prompt and the pristine flag.
pub fn assemble(input: &AssemblyInput<'_>) -> AssembledPrompt {
    if is_pristine(input.components, input.free_text) {
        return AssembledPrompt {
            display_prompt: placeholder::placeholder(input.language, input.ai_available)
                .to_string(),
            copy_prompt: String::new(),
            is_pristine: true,
        };
    }

    let ordered = ordered_values(input);
    let free_text = input.free_text.trim();

    let mut paragraphs: Vec<&str> = ordered.iter().map(|(_, v)| *v).collect();
    if !free_text.is_empty() {
        paragraphs.push(free_text);
    }
    let display_prompt = paragraphs.join(PARAGRAPH_SEPARATOR);

    let copy_prompt = match CopyLayout::for_input(input) {
        CopyLayout::Joined(separator) => paragraphs.join(separator),
        CopyLayout::MainWithParameters(main) => {
            let mut parts: Vec<&str> = Vec::with_capacity(paragraphs.len());
            if let Some((_, value)) = ordered.iter().find(|(id, _)| *id == main) {
                parts.push(*value);
            }
            parts.extend(
                ordered
                    .iter()
                    .filter(|(id, _)| *id != main)
                    .map(|(_, v)| *v),
            );
            if !free_text.is_empty() {
                parts.push(free_text);
            }
            parts.join(MEDIA_SEPARATOR)
        }
    };

    AssembledPrompt {
        display_prompt,
        copy_prompt,
        is_pristine: false,
    }
}

/// Trimmed non-empty `(field id, value)` pairs in field-definition order.
/// Components the field list does not know keep their relative order at the end.
fn ordered_values<'a>(input: &AssemblyInput<'a>) -> Vec<(&'a str, &'a str)> {
    let filled = |c: &&'a PromptComponent| !c.is_blank();
    let pair = |c: &'a PromptComponent| (c.id.as_str(), c.value.trim());

    let Some(locale) = input.locale else {
        return input.components.iter().filter(filled).map(pair).collect();
    };

    let position = |c: &PromptComponent| {
        locale
            .components
            .iter()
            .position(|f| f.id == c.id)
            .unwrap_or(usize::MAX)
    };

    let mut values: Vec<&'a PromptComponent> = input.components.iter().filter(filled).collect();
    // Stable sort keeps unknown components in their original order.
    values.sort_by_key(|c| position(*c));
    values.into_iter().map(pair).collect()
}
