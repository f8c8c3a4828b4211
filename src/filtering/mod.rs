//! # Query Translation
//!
//! Converts validated order directives and the global search term into a
//! store-agnostic filter/sort specification. The specification assumes
//! nothing about the backing store beyond four capabilities: prefix match,
//! equality-in-set, logical AND/OR, and sort-by-field — any store with
//! those primitives can execute it.
//!
//! The global search fans out as a logical OR over every field the
//! registry marks searchable, independent of which columns the client
//! requested. Enumerated fields are matched on their labels and the match
//! is translated back to the stored values, so the store only ever sees
//! vocabulary it actually contains.

mod search;
mod sort;
mod spec;

pub use search::build_search_filter;
pub use sort::build_sort_keys;
pub use spec::{FilterNode, SortKey};
