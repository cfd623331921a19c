//! The host store's column model, as seen by mappers.
//!
//! Mappers never touch the store's serialized cells. Rows arrive decomposed
//! into [`Columns`] of primitive values, and table metadata arrives as a
//! [`TableSchema`] of named, possibly nested [`ColumnType`]s. Nested values
//! use dotted names (`"address.city"`), resolved against the type tree with
//! [`ColumnType::child`].

use std::fmt;
use std::sync::Arc;

/// Type of a host column, possibly nested.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ColumnType {
    Text,
    Long,
    Boolean,
    Bytes,
    List(Box<ColumnType>),
    Set(Box<ColumnType>),
    Map(Box<ColumnType>, Box<ColumnType>),
    Tuple(Vec<ColumnType>),
    /// Named-field structure; fields are ordered as declared.
    Structured(Vec<(Arc<str>, ColumnType)>),
    /// Clustering-order wrapper around another type.
    Reversed(Box<ColumnType>),
}

impl ColumnType {
    pub fn list(element: ColumnType) -> ColumnType {
        ColumnType::List(Box::new(element))
    }

    pub fn set(element: ColumnType) -> ColumnType {
        ColumnType::Set(Box::new(element))
    }

    pub fn map(key: ColumnType, value: ColumnType) -> ColumnType {
        ColumnType::Map(Box::new(key), Box::new(value))
    }

    pub fn reversed(base: ColumnType) -> ColumnType {
        ColumnType::Reversed(Box::new(base))
    }

    pub fn structured<I, S>(fields: I) -> ColumnType
    where
        I: IntoIterator<Item = (S, ColumnType)>,
        S: Into<Arc<str>>,
    {
        ColumnType::Structured(
            fields
                .into_iter()
                .map(|(name, field)| (name.into(), field))
                .collect(),
        )
    }

    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            ColumnType::List(_) | ColumnType::Set(_) | ColumnType::Map(..)
        )
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ColumnType::List(_))
    }

    pub fn is_set(&self) -> bool {
        matches!(self, ColumnType::Set(_))
    }

    /// Resolves a nested child type by name.
    ///
    /// Structures resolve by field name, tuples by decimal position.
    /// Collections delegate to their element (map: value) type, so a child
    /// of `list<struct<city>>` is found through the list. Returns `None`
    /// when no such child exists.
    pub fn child(&self, name: &str) -> Option<&ColumnType> {
        match self {
            ColumnType::Structured(fields) => fields
                .iter()
                .find(|(field, _)| field.as_ref() == name)
                .map(|(_, child)| child),
            ColumnType::Tuple(items) => name.parse::<usize>().ok().and_then(|i| items.get(i)),
            ColumnType::List(element) | ColumnType::Set(element) => element.child(name),
            ColumnType::Map(_, value) => value.child(name),
            ColumnType::Reversed(base) => base.child(name),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Text => f.write_str("text"),
            ColumnType::Long => f.write_str("long"),
            ColumnType::Boolean => f.write_str("boolean"),
            ColumnType::Bytes => f.write_str("bytes"),
            ColumnType::List(element) => write!(f, "list<{element}>"),
            ColumnType::Set(element) => write!(f, "set<{element}>"),
            ColumnType::Map(key, value) => write!(f, "map<{key}, {value}>"),
            ColumnType::Tuple(items) => {
                f.write_str("tuple<")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt(f)?;
                }
                f.write_str(">")
            }
            ColumnType::Structured(fields) => {
                f.write_str("struct<")?;
                for (i, (name, field)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {field}")?;
                }
                f.write_str(">")
            }
            ColumnType::Reversed(base) => write!(f, "reversed<{base}>"),
        }
    }
}

/// A primitive cell value carried to mappers.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ColumnValue {
    Text(Arc<str>),
    Long(i64),
    Boolean(bool),
    Bytes(Arc<[u8]>),
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Text(v) => f.write_str(v),
            ColumnValue::Long(v) => v.fmt(f),
            ColumnValue::Boolean(v) => v.fmt(f),
            ColumnValue::Bytes(v) => {
                f.write_str("0x")?;
                for byte in v.iter() {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for ColumnValue {
    fn from(v: &str) -> Self {
        ColumnValue::Text(v.into())
    }
}

impl From<String> for ColumnValue {
    fn from(v: String) -> Self {
        ColumnValue::Text(v.into())
    }
}

impl From<i64> for ColumnValue {
    fn from(v: i64) -> Self {
        ColumnValue::Long(v)
    }
}

impl From<bool> for ColumnValue {
    fn from(v: bool) -> Self {
        ColumnValue::Boolean(v)
    }
}

impl From<Vec<u8>> for ColumnValue {
    fn from(v: Vec<u8>) -> Self {
        ColumnValue::Bytes(v.into())
    }
}

/// One decomposed cell: a (possibly dotted) name, its value, and whether it
/// came from a multi-cell (unfrozen collection) column.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Column {
    name: Arc<str>,
    value: ColumnValue,
    multi_cell: bool,
}

impl Column {
    pub fn new(name: impl Into<Arc<str>>, value: impl Into<ColumnValue>) -> Column {
        Column {
            name: name.into(),
            value: value.into(),
            multi_cell: false,
        }
    }

    /// A cell of an unfrozen collection column.
    pub fn multi_cell(name: impl Into<Arc<str>>, value: impl Into<ColumnValue>) -> Column {
        Column {
            name: name.into(),
            value: value.into(),
            multi_cell: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &ColumnValue {
        &self.value
    }

    pub fn is_multi_cell(&self) -> bool {
        self.multi_cell
    }
}

/// The decomposed cells of one row mutation.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Columns {
    columns: Vec<Column>,
}

impl Columns {
    pub fn new() -> Columns {
        Columns::default()
    }

    pub fn add(&mut self, column: Column) {
        self.columns.push(column);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Cells with the given name, in row order. Collections contribute one
    /// cell per element, all under the column's name.
    pub fn by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Column> + 'a {
        self.columns.iter().filter(move |column| column.name() == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FromIterator<Column> for Columns {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Columns {
        Columns {
            columns: iter.into_iter().collect(),
        }
    }
}

/// Definition of one table column.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ColumnDefinition {
    name: Arc<str>,
    column_type: ColumnType,
    is_static: bool,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<Arc<str>>, column_type: ColumnType) -> ColumnDefinition {
        ColumnDefinition {
            name: name.into(),
            column_type,
            is_static: false,
        }
    }

    pub fn static_column(name: impl Into<Arc<str>>, column_type: ColumnType) -> ColumnDefinition {
        ColumnDefinition {
            name: name.into(),
            column_type,
            is_static: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }
}

/// Table metadata a mapper is validated against.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct TableSchema {
    columns: Vec<ColumnDefinition>,
}

impl TableSchema {
    pub fn new() -> TableSchema {
        TableSchema::default()
    }

    pub fn with_column(mut self, name: impl Into<Arc<str>>, column_type: ColumnType) -> TableSchema {
        self.columns.push(ColumnDefinition::new(name, column_type));
        self
    }

    pub fn with_static_column(
        mut self,
        name: impl Into<Arc<str>>,
        column_type: ColumnType,
    ) -> TableSchema {
        self.columns
            .push(ColumnDefinition::static_column(name, column_type));
        self
    }

    /// Definition of a top-level column.
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|column| column.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_resolve_through_nesting() {
        let address = ColumnType::structured([
            ("city", ColumnType::Text),
            ("zip", ColumnType::Long),
        ]);
        assert_eq!(address.child("city"), Some(&ColumnType::Text));
        assert_eq!(address.child("zip"), Some(&ColumnType::Long));
        assert_eq!(address.child("country"), None);

        // Through collections down to the element type.
        let addresses = ColumnType::list(address.clone());
        assert_eq!(addresses.child("city"), Some(&ColumnType::Text));
        let by_label = ColumnType::map(ColumnType::Text, address.clone());
        assert_eq!(by_label.child("zip"), Some(&ColumnType::Long));

        let pair = ColumnType::Tuple(vec![ColumnType::Text, ColumnType::Long]);
        assert_eq!(pair.child("0"), Some(&ColumnType::Text));
        assert_eq!(pair.child("1"), Some(&ColumnType::Long));
        assert_eq!(pair.child("2"), None);
        assert_eq!(pair.child("first"), None);
    }

    #[test]
    fn types_render_readably() {
        assert_eq!(ColumnType::Text.to_string(), "text");
        assert_eq!(
            ColumnType::map(ColumnType::Text, ColumnType::Long).to_string(),
            "map<text, long>"
        );
        assert_eq!(
            ColumnType::reversed(ColumnType::set(ColumnType::Text)).to_string(),
            "reversed<set<text>>"
        );
        assert_eq!(
            ColumnType::structured([("city", ColumnType::Text)]).to_string(),
            "struct<city: text>"
        );
    }

    #[test]
    fn columns_filter_by_name_in_row_order() {
        let mut columns = Columns::new();
        columns.add(Column::new("tag", "a"));
        columns.add(Column::new("name", "row"));
        columns.add(Column::new("tag", "b"));

        let tags: Vec<&ColumnValue> = columns.by_name("tag").map(Column::value).collect();
        assert_eq!(
            tags,
            vec![&ColumnValue::Text("a".into()), &ColumnValue::Text("b".into())]
        );
        assert_eq!(columns.by_name("missing").count(), 0);
        assert_eq!(columns.len(), 3);
    }
}
