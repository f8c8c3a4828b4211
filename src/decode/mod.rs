//! # Request Decoding
//!
//! Turns the flat, index-keyed parameter set a table client sends into a
//! validated [`TableRequest`]. The wire format addresses columns and
//! orders positionally:
//!
//! ```text
//! draw=2&start=10&length=10
//! &columns[0][name]=first_name&columns[0][searchable]=true&columns[0][orderable]=true
//! &columns[1][name]=&columns[1][searchable]=false&columns[1][orderable]=false
//! &order[0][column]=0&order[0][dir]=asc
//! &search[value]=ada
//! ```
//!
//! Decoding is strict where the structure is concerned (scalars, column
//! blocks, unknown names fail the whole request) and lenient only for the
//! single documented case of an order entry referencing an unusable
//! column, which is dropped on its own.
//!
//! Column scanning is bounded by [`DecodeLimits::max_columns`] so a
//! hostile parameter set cannot force an unbounded scan.

mod columns;
mod orders;

use std::collections::HashMap;

use crate::errors::DataTablesError;
use crate::models::TableRequest;
use crate::registry::ColumnRegistry;

/// Default bound on the number of column slots examined per request.
pub const DEFAULT_MAX_COLUMNS: usize = 30;

/// Bounds applied while scanning the index-addressed parameter blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    pub max_columns: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self { max_columns: DEFAULT_MAX_COLUMNS }
    }
}

/// The flat parameter map handed over by the transport layer (the decoded
/// query-string equivalent). Keys keep their bracketed wire form.
#[derive(Debug, Clone, Default)]
pub struct RawParams(HashMap<String, String>);

impl RawParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl From<HashMap<String, String>> for RawParams {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Decodes and validates one request against the registry.
///
/// # Errors
///
/// Structural problems (missing or non-numeric `draw`/`start`/`length`,
/// broken column flags, non-numeric order references) and unknown column
/// names reject the whole request. See the module docs for the one
/// per-entry recoverable case.
pub fn decode_request(
    params: &RawParams,
    registry: &ColumnRegistry,
    limits: DecodeLimits,
) -> Result<TableRequest, DataTablesError> {
    let draw = scalar(params, "draw")?;
    let start = scalar(params, "start")?;
    let length = scalar(params, "length")?;

    let columns = columns::decode_columns(params, registry, limits)?;
    let orders = orders::decode_orders(params, &columns, registry.len())?;

    let search = params
        .get("search[value]")
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    Ok(TableRequest { draw, start, length, columns, orders, search })
}

fn scalar(params: &RawParams, key: &str) -> Result<u64, DataTablesError> {
    params
        .get(key)
        .ok_or_else(|| DataTablesError::bad_request(format!("missing required parameter '{key}'")))?
        .parse()
        .map_err(|_| {
            DataTablesError::bad_request(format!("parameter '{key}' must be a non-negative integer"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnSlot;

    fn registry() -> ColumnRegistry {
        ColumnRegistry::builder()
            .plain("first_name")
            .plain("last_name")
            .enumerated("gender", [("M", "Male"), ("F", "Female")])
            .searchable(["first_name", "gender"])
            .build()
            .unwrap()
    }

    fn base_params() -> RawParams {
        [("draw", "3"), ("start", "0"), ("length", "10")]
            .into_iter()
            .collect()
    }

    fn with_column(params: &mut RawParams, index: usize, name: &str) {
        params.insert(format!("columns[{index}][name]"), name);
        params.insert(format!("columns[{index}][searchable]"), "true");
        params.insert(format!("columns[{index}][orderable]"), "true");
    }

    #[test]
    fn decodes_scalars_and_search() {
        let mut params = base_params();
        params.insert("search[value]", "ada");
        let request = decode_request(&params, &registry(), DecodeLimits::default()).unwrap();
        assert_eq!(request.draw, 3);
        assert_eq!(request.start, 0);
        assert_eq!(request.length, 10);
        assert_eq!(request.search.as_deref(), Some("ada"));
    }

    #[test]
    fn empty_search_means_no_filter() {
        let mut params = base_params();
        params.insert("search[value]", "");
        let request = decode_request(&params, &registry(), DecodeLimits::default()).unwrap();
        assert_eq!(request.search, None);
    }

    #[test]
    fn missing_scalar_is_structural() {
        let params: RawParams = [("draw", "1"), ("start", "0")].into_iter().collect();
        let err = decode_request(&params, &registry(), DecodeLimits::default()).unwrap_err();
        assert!(matches!(err, DataTablesError::BadRequest { .. }));
    }

    #[test]
    fn non_numeric_scalar_is_structural() {
        let mut params = base_params();
        params.insert("length", "ten");
        let err = decode_request(&params, &registry(), DecodeLimits::default()).unwrap_err();
        assert!(matches!(err, DataTablesError::BadRequest { .. }));
    }

    #[test]
    fn negative_scalar_is_structural() {
        let mut params = base_params();
        params.insert("start", "-5");
        let err = decode_request(&params, &registry(), DecodeLimits::default()).unwrap_err();
        assert!(matches!(err, DataTablesError::BadRequest { .. }));
    }

    #[test]
    fn missing_first_name_key_yields_empty_column_list() {
        // Later indices are present but never examined.
        let mut params = base_params();
        with_column(&mut params, 1, "first_name");
        let request = decode_request(&params, &registry(), DecodeLimits::default()).unwrap();
        assert!(request.columns.is_empty());
    }

    #[test]
    fn placeholder_keeps_its_position() {
        let mut params = base_params();
        with_column(&mut params, 0, "first_name");
        params.insert("columns[1][name]", "");
        with_column(&mut params, 2, "gender");
        let request = decode_request(&params, &registry(), DecodeLimits::default()).unwrap();
        assert_eq!(request.columns.len(), 3);
        assert_eq!(request.columns[1], ColumnSlot::Placeholder);
        assert_eq!(request.columns[2].as_active().unwrap().name, "gender");
    }
}
