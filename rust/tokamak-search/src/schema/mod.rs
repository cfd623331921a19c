//! Mapping between host store columns and index fields.
//!
//! A [`Mapper`] owns one index field and reads one or more host columns to
//! populate it. Mappers are declared per index and checked against the table
//! schema up front ([`validate_schema`]), so a misconfigured index fails at
//! creation rather than on the first write. At write time the index driver
//! calls [`Mapper::add_fields`] for each mapper with the row's decomposed
//! cells.

mod column;
mod text;

pub use column::{Column, ColumnDefinition, ColumnType, ColumnValue, Columns, TableSchema};
pub use text::TextMapper;

use std::sync::Arc;

use tokamak_common::{Result, error::Error};
use tokamak_index::document::Document;
use tokamak_index::sort::SortField;

/// Maps host columns to one index field.
pub trait Mapper: Send + Sync {
    /// Name of the index field this mapper writes.
    fn field(&self) -> &str;

    /// Names of the host columns this mapper reads, possibly dotted for
    /// nested values.
    fn mapped_columns(&self) -> &[Arc<str>];

    /// Column types this mapper accepts, before collection unwrapping.
    fn supported_types(&self) -> &[ColumnType];

    /// Whether the field carries doc values and can back a sort.
    fn sorted(&self) -> bool;

    /// Whether writes through this mapper are checked before the store
    /// applies the mutation.
    fn validated(&self) -> bool;

    /// Adds this mapper's fields for one row to `document`.
    fn add_fields(&self, document: &mut Document, columns: &Columns) -> Result<()>;

    /// Sort criterion over this mapper's doc values.
    fn sort_field(&self, reverse: bool) -> SortField {
        if reverse {
            SortField::descending(self.field())
        } else {
            SortField::ascending(self.field())
        }
    }
}

/// Whether `column_type` is acceptable to a mapper supporting `supported`.
///
/// Collections are transparent: a `list<text>` is supported whenever `text`
/// is, maps are judged by their value type, and clustering-order reversal is
/// unwrapped. Only the innermost scalar type has to match.
pub fn supports(column_type: &ColumnType, supported: &[ColumnType]) -> bool {
    match column_type {
        ColumnType::List(element) | ColumnType::Set(element) => supports(element, supported),
        ColumnType::Map(_, value) => supports(value, supported),
        ColumnType::Reversed(base) => supports(base, supported),
        scalar => supported.contains(scalar),
    }
}

/// Checks every column a mapper reads against the table schema.
pub fn validate_schema(mapper: &dyn Mapper, schema: &TableSchema) -> Result<()> {
    for column in mapper.mapped_columns() {
        validate_column(mapper, schema, column)?;
    }
    Ok(())
}

/// Checks a single mapped column against the table schema.
///
/// The column must exist, must not be static, must not be a set or list when
/// the mapper sorts, and its resolved type must be supported. Dotted names
/// resolve segment by segment through the definition's type tree.
pub fn validate_column(mapper: &dyn Mapper, schema: &TableSchema, column: &str) -> Result<()> {
    let mut segments = column.split('.');
    let head = segments.next().unwrap_or(column);

    let definition = schema.column(head).ok_or_else(|| {
        Error::invalid_config(format!(
            "No column definition '{column}' for mapper '{field}'",
            field = mapper.field()
        ))
    })?;

    if definition.is_static() {
        return Err(Error::invalid_config(format!(
            "Search indexes are not allowed on static columns as '{column}'"
        )));
    }

    if mapper.sorted() {
        let base = match definition.column_type() {
            ColumnType::Reversed(inner) => inner.as_ref(),
            other => other,
        };
        if base.is_set() {
            return Err(Error::invalid_config(format!(
                "'{column}' can't be sorted because it's a set"
            )));
        }
        if base.is_list() {
            return Err(Error::invalid_config(format!(
                "'{column}' can't be sorted because it's a list"
            )));
        }
    }

    let mut resolved = definition.column_type();
    for segment in segments {
        resolved = resolved.child(segment).ok_or_else(|| {
            Error::invalid_config(format!(
                "No column definition '{column}' for mapper '{field}'",
                field = mapper.field()
            ))
        })?;
    }

    if !supports(resolved, mapper.supported_types()) {
        return Err(Error::invalid_config(format!(
            "'{resolved}' is not supported by mapper '{field}'",
            field = mapper.field()
        )));
    }

    Ok(())
}

/// Dry-runs a validated mapper against a row's cells.
///
/// Mappers with [`Mapper::validated`] get their value errors surfaced here,
/// before the store applies the mutation; the scratch document is discarded.
/// Unvalidated mappers defer errors to the real indexing pass.
pub fn validate_columns(mapper: &dyn Mapper, columns: &Columns) -> Result<()> {
    if !mapper.validated() {
        return Ok(());
    }
    let mut scratch = Document::new();
    mapper.add_fields(&mut scratch, columns)
}

/// Whether a row carries regular cells for every column the mapper reads.
///
/// Used to decide if a partial row update is complete enough to re-map the
/// field: each mapped column must have at least one cell, and none of them
/// may come from an unfrozen collection, whose full value a single mutation
/// does not carry.
pub fn maps_all(mapper: &dyn Mapper, columns: &Columns) -> bool {
    mapper.mapped_columns().iter().all(|name| {
        let mut cells = columns.by_name(name).peekable();
        cells.peek().is_some() && cells.all(|cell| !cell.is_multi_cell())
    })
}
