//! In-process data source over JSON rows.
//!
//! Useful for tests and small, already-materialized datasets. Foreign
//! paths traverse nested objects, so a related record is simply an
//! embedded object: `{"name": "Ada", "company": {"name": "Initech"}}`.

use std::cmp::Ordering;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{DataSource, Row};
use crate::errors::SourceError;
use crate::filtering::{FilterNode, SortKey};

/// A row backed by a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRow(Map<String, Value>);

impl MemoryRow {
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl Row for MemoryRow {
    fn value(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    fn related(&self, path: &str) -> Option<&Value> {
        let mut fields = &self.0;
        let mut segments = path.split('.').peekable();
        loop {
            let segment = segments.next()?;
            let value = fields.get(segment)?;
            if segments.peek().is_none() {
                return Some(value);
            }
            match value {
                Value::Object(next) => fields = next,
                _ => return None,
            }
        }
    }
}

/// A fixed set of rows filtered, sorted and paged in process.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Vec<MemoryRow>,
}

impl MemorySource {
    /// Builds a source from JSON values; non-object values are ignored.
    #[must_use]
    pub fn new<I: IntoIterator<Item = Value>>(rows: I) -> Self {
        Self {
            rows: rows
                .into_iter()
                .filter_map(|value| match value {
                    Value::Object(fields) => Some(MemoryRow(fields)),
                    _ => None,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl DataSource for MemorySource {
    type Row = MemoryRow;

    async fn count(&self, filter: Option<&FilterNode>) -> Result<u64, SourceError> {
        let count = self
            .rows
            .iter()
            .filter(|row| filter.is_none_or(|node| matches(row, node)))
            .count();
        Ok(count as u64)
    }

    async fn fetch(
        &self,
        filter: Option<&FilterNode>,
        sort: &[SortKey],
        offset: u64,
        limit: u64,
    ) -> Result<Vec<MemoryRow>, SourceError> {
        let mut rows: Vec<MemoryRow> = self
            .rows
            .iter()
            .filter(|row| filter.is_none_or(|node| matches(row, node)))
            .cloned()
            .collect();
        if !sort.is_empty() {
            // stable sort keeps insertion order for ties past the last key
            rows.sort_by(|a, b| compare(a, b, sort));
        }
        Ok(rows
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect())
    }
}

fn matches(row: &MemoryRow, node: &FilterNode) -> bool {
    match node {
        FilterNode::Any(children) => children.iter().any(|child| matches(row, child)),
        FilterNode::All(children) => children.iter().all(|child| matches(row, child)),
        FilterNode::StartsWith { target, term, case_insensitive } => {
            resolve(row, target).and_then(text_key).is_some_and(|text| {
                if *case_insensitive {
                    text.to_lowercase().starts_with(&term.to_lowercase())
                } else {
                    text.starts_with(term.as_str())
                }
            })
        }
        FilterNode::InSet { target, values } => resolve(row, target)
            .and_then(text_key)
            .is_some_and(|text| values.iter().any(|value| *value == text)),
    }
}

fn resolve<'a>(row: &'a MemoryRow, target: &str) -> Option<&'a Value> {
    if target.contains('.') {
        row.related(target)
    } else {
        row.value(target)
    }
}

fn text_key(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn compare(a: &MemoryRow, b: &MemoryRow, sort: &[SortKey]) -> Ordering {
    for key in sort {
        let ordering = compare_values(resolve(a, &key.target), resolve(b, &key.target));
        let ordering = if key.ascending { ordering } else { ordering.reverse() };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), Some(_)) => Ordering::Less,
        (Some(_), None | Some(Value::Null)) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            x.as_f64().partial_cmp(&y.as_f64()).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn people() -> MemorySource {
        MemorySource::new([
            json!({"name": "Ada", "age": 36, "company": {"name": "Initech"}}),
            json!({"name": "Grace", "age": 45, "company": {"name": "Globex"}}),
            json!({"name": "alan", "age": 41, "company": null}),
        ])
    }

    fn starts_with(target: &str, term: &str, case_insensitive: bool) -> FilterNode {
        FilterNode::StartsWith {
            target: target.into(),
            term: term.into(),
            case_insensitive,
        }
    }

    #[tokio::test]
    async fn count_without_filter_counts_everything() {
        assert_eq!(people().count(None).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn prefix_match_modes() {
        let source = people();
        let insensitive = starts_with("name", "a", true);
        assert_eq!(source.count(Some(&insensitive)).await.unwrap(), 2);
        let sensitive = starts_with("name", "a", false);
        assert_eq!(source.count(Some(&sensitive)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn dotted_targets_traverse_related_objects() {
        let filter = starts_with("company.name", "Glo", true);
        assert_eq!(people().count(Some(&filter)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn empty_in_set_matches_nothing() {
        let filter = FilterNode::InSet { target: "name".into(), values: vec![] };
        assert_eq!(people().count(Some(&filter)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn disjunction_and_conjunction() {
        let source = people();
        let any = FilterNode::Any(vec![
            starts_with("name", "Ada", false),
            starts_with("name", "Grace", false),
        ]);
        assert_eq!(source.count(Some(&any)).await.unwrap(), 2);
        let all = FilterNode::All(vec![
            starts_with("name", "A", true),
            starts_with("company.name", "Ini", true),
        ]);
        assert_eq!(source.count(Some(&all)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn sorts_and_pages() {
        let source = people();
        let sort = vec![SortKey { target: "age".into(), ascending: false }];
        let rows = source.fetch(None, &sort, 0, 2).await.unwrap();
        let names: Vec<&Value> = rows.iter().filter_map(|r| r.value("name")).collect();
        assert_eq!(names, [&json!("Grace"), &json!("alan")]);

        let rows = source.fetch(None, &sort, 2, 2).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value("name"), Some(&json!("Ada")));
    }

    #[tokio::test]
    async fn missing_values_sort_first_ascending() {
        let sort = vec![SortKey { target: "company.name".into(), ascending: true }];
        let rows = people().fetch(None, &sort, 0, 10).await.unwrap();
        assert_eq!(rows[0].value("name"), Some(&json!("alan")));
    }
}
