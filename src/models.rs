//! Wire-shaped types: the decoded request descriptor and the response
//! envelope.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// A requested column as sent by the client, with its per-request flags.
/// The local flags can narrow the registry policy for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub name: String,
    pub searchable: bool,
    pub orderable: bool,
}

/// One positional slot of the requested column list.
///
/// A `Placeholder` is a deliberately empty slot (a rendering-only column on
/// the client, e.g. an action button). It keeps its position so numeric
/// order references stay index-aligned, but it can never be an order or
/// search target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSlot {
    Active(ColumnRef),
    Placeholder,
}

impl ColumnSlot {
    #[must_use]
    pub fn as_active(&self) -> Option<&ColumnRef> {
        match self {
            Self::Active(column) => Some(column),
            Self::Placeholder => None,
        }
    }
}

/// A validated sort directive. Only constructed after the numeric column
/// reference resolved to a real, orderable column; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDirective {
    /// Index into the request's column list.
    pub column_index: usize,
    /// Registry name of the resolved column.
    pub field: String,
    pub ascending: bool,
}

/// The fully decoded and validated request descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRequest {
    /// Opaque client token, echoed verbatim in the response.
    pub draw: u64,
    pub start: u64,
    pub length: u64,
    pub columns: Vec<ColumnSlot>,
    pub orders: Vec<OrderDirective>,
    pub search: Option<String>,
}

/// The response envelope, serialized in the shape table clients expect:
/// `{"draw": .., "recordsTotal": .., "recordsFiltered": .., "data": [..]}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TableResponse {
    /// Echo of the request's draw token.
    pub draw: u64,
    /// Row count before filtering (or the filtered count, depending on the
    /// configured [`CountMode`](crate::processor::CountMode)).
    #[serde(rename = "recordsTotal")]
    pub records_total: u64,
    /// Row count after the global search filter.
    #[serde(rename = "recordsFiltered")]
    pub records_filtered: u64,
    /// One rendered page of rows.
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Map<String, Value>>,
}

impl IntoResponse for TableResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
