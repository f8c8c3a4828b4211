//! # Backing Store Boundary
//!
//! The processing pipeline talks to its data through two narrow traits:
//! [`DataSource`] executes the store-agnostic filter/sort specification
//! (one count, one page fetch per request), and [`Row`] exposes
//! field-by-name reads plus related-record traversal for foreign paths.
//!
//! Two implementations ship with the crate: [`MemorySource`] over
//! in-process JSON rows, and [`SeaOrmSource`] executing through a
//! `sea_orm::DatabaseConnection`.

pub mod memory;
pub mod sea_orm;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SourceError;
use crate::filtering::{FilterNode, SortKey};

pub use self::memory::{MemoryRow, MemorySource};
pub use self::sea_orm::{JoinClause, JsonRow, SeaOrmSource};

/// One backing row: field-by-name reads, plus traversal to related
/// values for foreign paths (`related("company.name")`).
pub trait Row: Send + Sync {
    fn value(&self, field: &str) -> Option<&Value>;
    fn related(&self, path: &str) -> Option<&Value>;
}

/// A store that can execute the filter/sort specification. Implementors
/// only need equality-in-set, prefix match, AND/OR, and sort-by-field.
#[async_trait]
pub trait DataSource: Send + Sync {
    type Row: Row;

    /// Row count under the given filter; `None` counts everything.
    async fn count(&self, filter: Option<&FilterNode>) -> Result<u64, SourceError>;

    /// Fetches one window of rows under the given filter and sort keys.
    async fn fetch(
        &self,
        filter: Option<&FilterNode>,
        sort: &[SortKey],
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self::Row>, SourceError>;
}
