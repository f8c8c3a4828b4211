//! Row rendering: one output mapping per backing row, shaped by the
//! registry's per-field kind.

use serde_json::{Map, Value};

use crate::errors::DataTablesError;
use crate::registry::{ColumnRegistry, FieldKind};
use crate::source::Row;

/// Per-row customization hook, invoked after kind-based rendering with
/// the rendered mapping and the source row. Implemented for any matching
/// closure, so applications compose it at construction time:
///
/// ```rust,ignore
/// DataTable::builder(registry, source)
///     .customize(|row, _source| {
///         row.insert("actions".into(), json!("<a href=#>edit</a>"));
///     })
///     .build()?;
/// ```
pub trait RowCustomizer: Send + Sync {
    fn customize(&self, rendered: &mut Map<String, Value>, source: &dyn Row);
}

impl<F> RowCustomizer for F
where
    F: Fn(&mut Map<String, Value>, &dyn Row) + Send + Sync,
{
    fn customize(&self, rendered: &mut Map<String, Value>, source: &dyn Row) {
        self(rendered, source);
    }
}

/// Renders one row over every registry field, in declaration order.
///
/// Plain fields pass the raw value through (`null` when absent). Foreign
/// fields resolve their path and render the related value's string form,
/// `null` when the related record or value is missing. Enumerated fields
/// map the stored value to its label.
///
/// # Errors
///
/// Returns [`DataTablesError::ChoiceIntegrity`] when an enumerated stored
/// value (including a missing one) has no registered label; the backing
/// data violates its declared vocabulary and the error must not be masked.
pub fn render_row(
    registry: &ColumnRegistry,
    row: &dyn Row,
) -> Result<Map<String, Value>, DataTablesError> {
    let mut rendered = Map::new();
    for field in registry.fields() {
        let value = match &field.kind {
            FieldKind::Plain => row.value(&field.name).cloned().unwrap_or(Value::Null),
            FieldKind::Foreign { path } => match row.related(path) {
                None | Some(Value::Null) => Value::Null,
                Some(Value::String(text)) => Value::String(text.clone()),
                Some(other) => Value::String(other.to_string()),
            },
            FieldKind::Enumerated { choices } => {
                let stored = row.value(&field.name).and_then(stored_key);
                let Some(stored) = stored else {
                    return Err(DataTablesError::choice_integrity(&field.name, "<missing>"));
                };
                let Some(choice) = choices.iter().find(|c| c.stored == stored) else {
                    return Err(DataTablesError::choice_integrity(&field.name, stored));
                };
                Value::String(choice.label.clone())
            }
        };
        rendered.insert(field.name.clone(), value);
    }
    Ok(rendered)
}

// Stored values may arrive as strings or numbers depending on the backing
// column type; both compare against the declared vocabulary as text.
fn stored_key(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryRow;
    use serde_json::json;

    fn registry() -> ColumnRegistry {
        ColumnRegistry::builder()
            .plain("first_name")
            .foreign("company", "company.name")
            .enumerated("gender", [("M", "Male"), ("F", "Female")])
            .build()
            .unwrap()
    }

    fn row(value: serde_json::Value) -> MemoryRow {
        match value {
            Value::Object(fields) => MemoryRow::new(fields),
            _ => unreachable!(),
        }
    }

    #[test]
    fn renders_each_kind() {
        let row = row(json!({
            "first_name": "Ada",
            "gender": "F",
            "company": {"name": "Initech"},
        }));
        let rendered = render_row(&registry(), &row).unwrap();
        assert_eq!(rendered["first_name"], json!("Ada"));
        assert_eq!(rendered["company"], json!("Initech"));
        assert_eq!(rendered["gender"], json!("Female"));
    }

    #[test]
    fn missing_related_record_renders_null() {
        let row = row(json!({"first_name": "Ada", "gender": "F"}));
        let rendered = render_row(&registry(), &row).unwrap();
        assert_eq!(rendered["company"], Value::Null);
    }

    #[test]
    fn non_string_related_value_is_stringified() {
        let row = row(json!({
            "first_name": "Ada",
            "gender": "F",
            "company": {"name": 42},
        }));
        let rendered = render_row(&registry(), &row).unwrap();
        assert_eq!(rendered["company"], json!("42"));
    }

    #[test]
    fn unregistered_stored_value_is_fatal() {
        let row = row(json!({"first_name": "Ada", "gender": "X", "company": null}));
        let err = render_row(&registry(), &row).unwrap_err();
        assert!(matches!(
            err,
            DataTablesError::ChoiceIntegrity { field, stored } if field == "gender" && stored == "X"
        ));
    }

    #[test]
    fn missing_stored_value_is_fatal() {
        let row = row(json!({"first_name": "Ada", "company": null}));
        let err = render_row(&registry(), &row).unwrap_err();
        assert!(matches!(err, DataTablesError::ChoiceIntegrity { .. }));
    }

    #[test]
    fn numeric_stored_values_match_as_text() {
        let registry = ColumnRegistry::builder()
            .enumerated("status", [("1", "Open"), ("2", "Closed")])
            .build()
            .unwrap();
        let row = row(json!({"status": 2}));
        let rendered = render_row(&registry, &row).unwrap();
        assert_eq!(rendered["status"], json!("Closed"));
    }

    #[test]
    fn customizer_sees_rendered_row_and_source() {
        let row = row(json!({"first_name": "Ada", "gender": "F", "company": null}));
        let mut rendered = render_row(&registry(), &row).unwrap();
        let hook = |out: &mut Map<String, Value>, source: &dyn Row| {
            let name = source.value("first_name").cloned().unwrap_or(Value::Null);
            out.insert("greeting".into(), json!(format!("hi {name}")));
        };
        hook.customize(&mut rendered, &row);
        assert_eq!(rendered["greeting"], json!("hi \"Ada\""));
    }
}
