//! Carries component values onto another field list.
//!
//! Policy: when any field id of the target list exists among the current
//! components, values move by id and unmatched fields start empty. Only when no
//! id matches at all are values carried by position. Field ids are stable
//! across languages, so language switches always take the id path.

use crate::catalog::FieldDef;
use crate::models::prompt::PromptComponent;

pub fn remap_components(current: &[PromptComponent], fields: &[FieldDef]) -> Vec<PromptComponent> {
    let by_id = fields
        .iter()
        .any(|f| current.iter().any(|c| c.id == f.id));

    fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let source = if by_id {
                current.iter().find(|c| c.id == field.id)
            } else {
                current.get(index)
            };
            let value = source.map(|c| c.value.clone()).unwrap_or_default();
            PromptComponent {
                id: field.id.clone(),
                value,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(ids: &[&str]) -> Vec<FieldDef> {
        ids.iter()
            .map(|id| FieldDef {
                id: id.to_string(),
                label: id.to_uppercase(),
                placeholder: None,
                tooltip: None,
            })
            .collect()
    }

    fn values(pairs: &[(&str, &str)]) -> Vec<PromptComponent> {
        pairs
            .iter()
            .map(|(id, value)| PromptComponent {
                id: id.to_string(),
                value: value.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_matching_ids_remap_by_id() {
        let current = values(&[("task", "T"), ("role", "R")]);
        let out = remap_components(&current, &fields(&["role", "task", "format"]));
        assert_eq!(out, values(&[("role", "R"), ("task", "T"), ("format", "")]));
    }

    #[test]
    fn test_no_matching_ids_remap_by_position() {
        let current = values(&[("a", "first"), ("b", "second")]);
        let out = remap_components(&current, &fields(&["role", "task", "format"]));
        assert_eq!(
            out,
            values(&[("role", "first"), ("task", "second"), ("format", "")])
        );
    }

    #[test]
    fn test_extra_positional_values_are_dropped() {
        let current = values(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let out = remap_components(&current, &fields(&["x"]));
        assert_eq!(out, values(&[("x", "1")]));
    }

    #[test]
    fn test_empty_current_gives_empty_fields() {
        let out = remap_components(&[], &fields(&["role"]));
        assert_eq!(out, values(&[("role", "")]));
    }
}
