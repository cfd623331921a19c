use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use ahash::AHashSet;

/// Field names requested when loading a document's stored fields.
pub type FieldSet = AHashSet<Arc<str>>;

/// Builds a [`FieldSet`] from anything yielding names.
pub fn field_set<I, S>(names: I) -> FieldSet
where
    I: IntoIterator<Item = S>,
    S: Into<Arc<str>>,
{
    names.into_iter().map(Into::into).collect()
}

/// A single field value.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum FieldValue {
    Long(i64),
    Text(Arc<str>),
    Bytes(Arc<[u8]>),
}

impl FieldValue {
    const fn rank(&self) -> u8 {
        match self {
            FieldValue::Long(_) => 0,
            FieldValue::Text(_) => 1,
            FieldValue::Bytes(_) => 2,
        }
    }
}

/// Total order for sort keys: numeric values first, then text, then bytes,
/// natural order within a kind. Sort fields normally hold one kind only; the
/// cross-kind order just keeps comparisons total.
impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Long(a), FieldValue::Long(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Bytes(a), FieldValue::Bytes(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Long(v) => v.fmt(f),
            FieldValue::Text(v) => f.write_str(v),
            FieldValue::Bytes(v) => {
                f.write_str("0x")?;
                for byte in v.iter() {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Long(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.into())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v.into())
    }
}

impl From<Arc<str>> for FieldValue {
    fn from(v: Arc<str>) -> Self {
        FieldValue::Text(v)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(v: Vec<u8>) -> Self {
        FieldValue::Bytes(v.into())
    }
}

/// One named value in a document, plus how the engine treats it.
///
/// `stored` makes the value retrievable, `indexed` makes it term-searchable,
/// `doc_values` makes it sortable and range-filterable.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Field {
    name: Arc<str>,
    value: FieldValue,
    stored: bool,
    indexed: bool,
    doc_values: bool,
}

impl Field {
    pub fn new(
        name: impl Into<Arc<str>>,
        value: impl Into<FieldValue>,
        stored: bool,
        indexed: bool,
        doc_values: bool,
    ) -> Field {
        Field {
            name: name.into(),
            value: value.into(),
            stored,
            indexed,
            doc_values,
        }
    }

    /// Stored-only field.
    pub fn stored(name: impl Into<Arc<str>>, value: impl Into<FieldValue>) -> Field {
        Field::new(name, value, true, false, false)
    }

    /// Indexed-only field.
    pub fn indexed(name: impl Into<Arc<str>>, value: impl Into<FieldValue>) -> Field {
        Field::new(name, value, false, true, false)
    }

    /// Doc-values-only field.
    pub fn doc_values(name: impl Into<Arc<str>>, value: impl Into<FieldValue>) -> Field {
        Field::new(name, value, false, false, true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn is_stored(&self) -> bool {
        self.stored
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    pub fn has_doc_values(&self) -> bool {
        self.doc_values
    }
}

/// An index document: a flat bag of named fields.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Document {
    fields: Vec<Field>,
}

impl Document {
    pub fn new() -> Document {
        Document::default()
    }

    pub fn add(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First field with the given name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Value of the first field with the given name.
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.get(name).map(Field::value)
    }
}
