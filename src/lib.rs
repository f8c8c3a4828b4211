//! # axum-datatables
//!
//! Server-side processing for paginated, searchable, sortable table
//! requests in Axum, with Sea-ORM as the shipped backing store.
//!
//! Table clients send one flat, index-keyed parameter set per page:
//!
//! ```text
//! GET /employees?draw=2&start=10&length=10
//!     &columns[0][name]=first_name&columns[0][searchable]=true&columns[0][orderable]=true
//!     &columns[1][name]=gender&columns[1][searchable]=true&columns[1][orderable]=false
//!     &order[0][column]=0&order[0][dir]=asc
//!     &search[value]=ada
//! ```
//!
//! and expect a fixed envelope back:
//!
//! ```json
//! {"draw": 2, "recordsTotal": 57, "recordsFiltered": 3, "data": [{"first_name": "Ada", ...}]}
//! ```
//!
//! This crate decodes and validates the wire format, translates it into a
//! store-agnostic filter/sort specification, executes it through a narrow
//! [`DataSource`] seam, clamps the page window, renders rows per column
//! kind (plain, foreign, enumerated), and assembles the envelope.
//!
//! ## Quickstart
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use axum::{Router, routing::get};
//! use axum_datatables::{
//!     ColumnRegistry, DataTable, serve_table,
//!     source::{JoinClause, SeaOrmSource},
//! };
//!
//! let registry = ColumnRegistry::builder()
//!     .plain("first_name")
//!     .plain("last_name")
//!     .foreign("company", "company.name")
//!     .enumerated("gender", [("M", "Male"), ("F", "Female")])
//!     .searchable(["first_name", "last_name", "company", "gender"])
//!     .build()?;
//!
//! let source = SeaOrmSource::new(db, "employees").join(JoinClause {
//!     alias: "company".into(),
//!     table: "companies".into(),
//!     from_column: "company_id".into(),
//!     to_column: "id".into(),
//!     columns: vec!["name".into()],
//! });
//!
//! let table = Arc::new(DataTable::builder(registry, source).build()?);
//! let app: Router = Router::new()
//!     .route("/employees", get(serve_table::<SeaOrmSource>))
//!     .with_state(table);
//! ```
//!
//! ## Column kinds
//!
//! - **Plain** fields read straight off the backing row.
//! - **Foreign** fields resolve a dotted path into a related record and
//!   render its string form (`null` when the relation is absent).
//! - **Enumerated** fields hold a fixed `(stored, label)` vocabulary:
//!   the global search matches label prefixes and translates them back to
//!   stored values; rendering maps stored value to label and treats an
//!   unregistered value as a data-integrity failure.
//!
//! Every request is processed independently and statelessly; the registry
//! is the only shared state and is immutable after startup.

pub mod decode;
pub mod errors;
pub mod filtering;
pub mod handler;
pub mod models;
pub mod pagination;
pub mod processor;
pub mod registry;
pub mod render;
pub mod source;

pub use decode::{DecodeLimits, RawParams};
pub use errors::{DataTablesError, SourceError};
pub use filtering::{FilterNode, SortKey};
pub use handler::serve_table;
pub use models::{ColumnRef, ColumnSlot, OrderDirective, TableRequest, TableResponse};
pub use pagination::PageWindow;
pub use processor::{CountMode, DataTable, DataTableBuilder};
pub use registry::{Choice, ColumnRegistry, FieldDef, FieldKind, RegistryBuilder, RegistryError};
pub use render::{RowCustomizer, render_row};
pub use source::{DataSource, Row};
