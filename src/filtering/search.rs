//! Global search translation.

use crate::filtering::spec::FilterNode;
use crate::registry::{ColumnRegistry, FieldKind};

/// Builds the global-search filter: one clause per registry-searchable
/// field, OR-combined.
///
/// Plain fields prefix-match on their own name, foreign fields on their
/// path. Enumerated fields resolve the term as a label prefix and match
/// the stored values behind the matching labels; no matching label means
/// the clause matches nothing. Returns `None` when there is no term or
/// the registry declares no searchable field.
#[must_use]
pub fn build_search_filter(
    registry: &ColumnRegistry,
    term: Option<&str>,
    case_insensitive: bool,
) -> Option<FilterNode> {
    let term = term?;
    let clauses: Vec<FilterNode> = registry
        .searchable_fields()
        .map(|field| match &field.kind {
            FieldKind::Plain | FieldKind::Foreign { .. } => FilterNode::StartsWith {
                target: field.target().to_string(),
                term: term.to_string(),
                case_insensitive,
            },
            FieldKind::Enumerated { choices } => FilterNode::InSet {
                target: field.name.clone(),
                values: choices
                    .iter()
                    .filter(|choice| label_matches(&choice.label, term, case_insensitive))
                    .map(|choice| choice.stored.clone())
                    .collect(),
            },
        })
        .collect();

    if clauses.is_empty() {
        None
    } else {
        Some(FilterNode::Any(clauses))
    }
}

fn label_matches(label: &str, term: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        label.to_lowercase().starts_with(&term.to_lowercase())
    } else {
        label.starts_with(term)
    }
}
