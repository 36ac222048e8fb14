//! Splits free-form assistant answers into header-delimited sections.
//!
//! Headers are markdown headings (`#`, `##`, ...) or lines that are entirely
//! bold (`**Title**`). Text before the first header becomes an untitled section.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub body: String,
}

pub fn parse_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut title = String::new();
    let mut body: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some(header) = header_title(line) {
            push_section(&mut sections, &title, &body);
            title = header.to_string();
            body.clear();
        } else {
            body.push(line);
        }
    }
    push_section(&mut sections, &title, &body);
    sections
}

fn header_title(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.starts_with('#') {
        let title = line.trim_start_matches('#').trim();
        return (!title.is_empty()).then_some(title);
    }
    let inner = line.strip_prefix("**")?.strip_suffix("**")?;
    let inner = inner.trim().trim_end_matches(':').trim();
    (!inner.is_empty() && !inner.contains("**")).then_some(inner)
}

fn push_section(sections: &mut Vec<Section>, title: &str, body: &[&str]) {
    let body = body.join("\n").trim().to_string();
    if title.is_empty() && body.is_empty() {
        return;
    }
    sections.push(Section {
        title: title.to_string(),
        body,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_headers() {
        let text = "## Strengths\nClear role.\n\n## Improvements\n- Add a length limit\n- Name the audience\n";
        let sections = parse_sections(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Strengths");
        assert_eq!(sections[0].body, "Clear role.");
        assert_eq!(sections[1].title, "Improvements");
        assert!(sections[1].body.contains("Name the audience"));
    }

    #[test]
    fn test_bold_headers_and_preamble() {
        let text = "Overall good.\n**Clarity:**\nFine\n**Score**\n8/10";
        let sections = parse_sections(text);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].title, "");
        assert_eq!(sections[0].body, "Overall good.");
        assert_eq!(sections[1].title, "Clarity");
        assert_eq!(sections[2].body, "8/10");
    }

    #[test]
    fn test_inline_bold_is_not_a_header() {
        let sections = parse_sections("**Use** a **shorter** intro");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "");
    }

    #[test]
    fn test_empty_text_has_no_sections() {
        assert!(parse_sections("  \n ").is_empty());
    }
}
