//! Axum boundary glue.
//!
//! The transport layer owns request policy (authentication, rejecting
//! non-AJAX requests, and so on); this handler only adapts the decoded
//! query string to the core and the envelope/errors back to HTTP.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};

use crate::decode::RawParams;
use crate::errors::DataTablesError;
use crate::models::TableResponse;
use crate::processor::DataTable;
use crate::source::DataSource;

/// Serves one [`DataTable`] from shared state.
///
/// ```rust,ignore
/// use axum::{Router, routing::get};
/// use axum_datatables::{DataTable, serve_table, source::MemorySource};
///
/// let table = Arc::new(DataTable::builder(registry, source).build()?);
/// let app: Router = Router::new()
///     .route("/employees", get(serve_table::<MemorySource>))
///     .with_state(table);
/// ```
///
/// # Errors
///
/// Structural and referential decode failures map to 400; integrity and
/// store failures map to 500 with a sanitized body.
pub async fn serve_table<S>(
    State(table): State<Arc<DataTable<S>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<TableResponse, DataTablesError>
where
    S: DataSource + 'static,
{
    table.process(&RawParams::from(params)).await
}
