//! Mapper indexing column values as text terms.

use std::sync::Arc;

use tokamak_common::{Result, error::Error};
use tokamak_index::document::{Document, Field, FieldValue};

use super::{Column, ColumnType, ColumnValue, Columns, Mapper};

/// Maps one host column to a text field, indexing each cell's value as a
/// single term.
///
/// Text cells index as-is; longs and booleans index their canonical rendering
/// so the same literal matches in queries. Bytes have no canonical text form
/// and are rejected, at write time or up front when the mapper is validated.
#[derive(Clone, Debug)]
pub struct TextMapper {
    field: Arc<str>,
    columns: [Arc<str>; 1],
    sorted: bool,
    validated: bool,
}

const SUPPORTED: &[ColumnType] = &[ColumnType::Text, ColumnType::Long, ColumnType::Boolean];

impl TextMapper {
    pub fn new(field: impl Into<Arc<str>>, column: impl Into<Arc<str>>) -> TextMapper {
        TextMapper {
            field: field.into(),
            columns: [column.into()],
            sorted: false,
            validated: false,
        }
    }

    /// Makes the field carry doc values so it can back a sort.
    pub fn with_sorted(mut self, sorted: bool) -> TextMapper {
        self.sorted = sorted;
        self
    }

    /// Makes writes through this mapper checked before the store applies
    /// the mutation.
    pub fn with_validated(mut self, validated: bool) -> TextMapper {
        self.validated = validated;
        self
    }

    pub fn column(&self) -> &str {
        &self.columns[0]
    }

    fn term(&self, cell: &Column) -> Result<Arc<str>> {
        match cell.value() {
            ColumnValue::Text(v) => Ok(v.clone()),
            ColumnValue::Long(v) => Ok(v.to_string().into()),
            ColumnValue::Boolean(v) => Ok(if *v { "true".into() } else { "false".into() }),
            value @ ColumnValue::Bytes(_) => Err(Error::invalid_config(format!(
                "Field '{field}' requires a text value, but found '{value}'",
                field = self.field
            ))),
        }
    }
}

impl Mapper for TextMapper {
    fn field(&self) -> &str {
        &self.field
    }

    fn mapped_columns(&self) -> &[Arc<str>] {
        &self.columns
    }

    fn supported_types(&self) -> &[ColumnType] {
        SUPPORTED
    }

    fn sorted(&self) -> bool {
        self.sorted
    }

    fn validated(&self) -> bool {
        self.validated
    }

    fn add_fields(&self, document: &mut Document, columns: &Columns) -> Result<()> {
        for cell in columns.by_name(self.column()) {
            let term: FieldValue = self.term(cell)?.into();
            document.add(Field::new(self.field.clone(), term, false, true, self.sorted));
        }
        Ok(())
    }
}
