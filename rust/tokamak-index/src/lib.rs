//! Index-engine seam: documents and fields, the compiled query and sort
//! model, the searcher acquire/release discipline, and an in-memory engine.
//!
//! The traits in [`searcher`] are the boundary the retrieval layers build
//! against; [`memory::MemoryIndex`] is the in-process implementation used by
//! embedded deployments and tests.

pub mod document;
pub mod memory;
pub mod query;
pub mod searcher;
pub mod sort;

pub use document::{Document, Field, FieldSet, FieldValue, field_set};
pub use memory::MemoryIndex;
pub use query::Query;
pub use searcher::{Hit, Searcher, SearcherLease, SearcherSource};
pub use sort::{ResolvedSort, SortField, SortSpec};
