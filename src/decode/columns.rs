//! Column block decoding.

use crate::decode::{DecodeLimits, RawParams};
use crate::errors::DataTablesError;
use crate::models::{ColumnRef, ColumnSlot};
use crate::registry::ColumnRegistry;

/// Scans `columns[i][...]` blocks in index order until the first index
/// with no `name` key, up to `limits.max_columns`.
///
/// An empty name records a [`ColumnSlot::Placeholder`] at that position; a
/// name missing from the registry rejects the whole request (schema
/// mismatch). The `searchable`/`orderable` flags are required on active
/// columns and only the literal `"true"` enables them.
pub(crate) fn decode_columns(
    params: &RawParams,
    registry: &ColumnRegistry,
    limits: DecodeLimits,
) -> Result<Vec<ColumnSlot>, DataTablesError> {
    let mut slots = Vec::new();

    for index in 0..limits.max_columns {
        let Some(name) = params.get(&format!("columns[{index}][name]")) else {
            break;
        };
        if name.is_empty() {
            slots.push(ColumnSlot::Placeholder);
            continue;
        }
        if registry.field(name).is_none() {
            return Err(DataTablesError::unknown_column(name));
        }
        slots.push(ColumnSlot::Active(ColumnRef {
            name: name.to_string(),
            searchable: flag(params, index, "searchable")?,
            orderable: flag(params, index, "orderable")?,
        }));
    }

    Ok(slots)
}

fn flag(params: &RawParams, index: usize, key: &str) -> Result<bool, DataTablesError> {
    params
        .get(&format!("columns[{index}][{key}]"))
        .map(|value| value == "true")
        .ok_or_else(|| DataTablesError::bad_request(format!("missing 'columns[{index}][{key}]'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ColumnRegistry {
        ColumnRegistry::builder()
            .plain("first_name")
            .plain("age")
            .build()
            .unwrap()
    }

    fn column_params(entries: &[(usize, &str, &str, &str)]) -> RawParams {
        let mut params = RawParams::new();
        for (index, name, searchable, orderable) in entries {
            params.insert(format!("columns[{index}][name]"), *name);
            params.insert(format!("columns[{index}][searchable]"), *searchable);
            params.insert(format!("columns[{index}][orderable]"), *orderable);
        }
        params
    }

    #[test]
    fn decodes_in_index_order() {
        let params = column_params(&[(0, "age", "false", "true"), (1, "first_name", "true", "false")]);
        let slots = decode_columns(&params, &registry(), DecodeLimits::default()).unwrap();
        assert_eq!(slots.len(), 2);
        let first = slots[0].as_active().unwrap();
        assert_eq!(first.name, "age");
        assert!(!first.searchable);
        assert!(first.orderable);
    }

    #[test]
    fn stops_at_first_gap() {
        let params = column_params(&[(0, "age", "true", "true"), (2, "first_name", "true", "true")]);
        let slots = decode_columns(&params, &registry(), DecodeLimits::default()).unwrap();
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn unknown_name_rejects_request() {
        let params = column_params(&[(0, "salary", "true", "true")]);
        let err = decode_columns(&params, &registry(), DecodeLimits::default()).unwrap_err();
        assert!(matches!(err, DataTablesError::UnknownColumn { name } if name == "salary"));
    }

    #[test]
    fn missing_flag_is_structural() {
        let mut params = RawParams::new();
        params.insert("columns[0][name]", "age");
        params.insert("columns[0][searchable]", "true");
        let err = decode_columns(&params, &registry(), DecodeLimits::default()).unwrap_err();
        assert!(matches!(err, DataTablesError::BadRequest { .. }));
    }

    #[test]
    fn non_true_flag_values_disable() {
        let params = column_params(&[(0, "age", "TRUE", "1")]);
        let slots = decode_columns(&params, &registry(), DecodeLimits::default()).unwrap();
        let column = slots[0].as_active().unwrap();
        assert!(!column.searchable);
        assert!(!column.orderable);
    }

    #[test]
    fn scan_respects_injected_bound() {
        let params = column_params(&[
            (0, "age", "true", "true"),
            (1, "first_name", "true", "true"),
            (2, "age", "true", "true"),
        ]);
        let slots =
            decode_columns(&params, &registry(), DecodeLimits { max_columns: 2 }).unwrap();
        assert_eq!(slots.len(), 2);
    }
}
