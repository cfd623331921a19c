use std::fmt;
use std::sync::Arc;

use crate::document::{Document, FieldValue};

/// A compiled index query.
///
/// The model is deliberately small: exact terms, numeric ranges over
/// doc-values and conjunctions are what the token layer composes. The
/// `Display` rendering is the classic index-engine text form and is what
/// search errors carry.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Query {
    /// Matches every document.
    All,
    /// Exact match on an indexed field value.
    Term {
        field: Arc<str>,
        value: FieldValue,
    },
    /// Range over a numeric doc-values field; `None` ends are unbounded.
    NumericRange {
        field: Arc<str>,
        lower: Option<i64>,
        upper: Option<i64>,
        include_lower: bool,
        include_upper: bool,
    },
    /// Conjunction of sub-queries.
    And(Vec<Query>),
}

impl Query {
    pub fn term(field: impl Into<Arc<str>>, value: impl Into<FieldValue>) -> Query {
        Query::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Conjoins clauses, dropping match-alls and collapsing trivial shapes.
    pub fn conjunction(clauses: impl IntoIterator<Item = Query>) -> Query {
        let mut clauses: Vec<Query> = clauses
            .into_iter()
            .filter(|clause| !matches!(clause, Query::All))
            .collect();
        match clauses.len() {
            0 => Query::All,
            1 => clauses.remove(0),
            _ => Query::And(clauses),
        }
    }

    /// Whether a document matches this query.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Query::All => true,
            Query::Term { field, value } => document
                .fields()
                .iter()
                .any(|f| f.is_indexed() && f.name() == field.as_ref() && f.value() == value),
            Query::NumericRange {
                field,
                lower,
                upper,
                include_lower,
                include_upper,
            } => document.fields().iter().any(|f| {
                f.has_doc_values()
                    && f.name() == field.as_ref()
                    && match f.value() {
                        FieldValue::Long(v) => {
                            in_lower(*v, *lower, *include_lower)
                                && in_upper(*v, *upper, *include_upper)
                        }
                        _ => false,
                    }
            }),
            Query::And(clauses) => clauses.iter().all(|clause| clause.matches(document)),
        }
    }
}

fn in_lower(value: i64, bound: Option<i64>, inclusive: bool) -> bool {
    match bound {
        None => true,
        Some(bound) if inclusive => value >= bound,
        Some(bound) => value > bound,
    }
}

fn in_upper(value: i64, bound: Option<i64>, inclusive: bool) -> bool {
    match bound {
        None => true,
        Some(bound) if inclusive => value <= bound,
        Some(bound) => value < bound,
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::All => f.write_str("*:*"),
            Query::Term { field, value } => write!(f, "{field}:{value}"),
            Query::NumericRange {
                field,
                lower,
                upper,
                include_lower,
                include_upper,
            } => {
                let open = if *include_lower { '[' } else { '{' };
                let close = if *include_upper { ']' } else { '}' };
                write!(f, "{field}:{open}")?;
                match lower {
                    Some(bound) => write!(f, "{bound}")?,
                    None => f.write_str("*")?,
                }
                f.write_str(" TO ")?;
                match upper {
                    Some(bound) => write!(f, "{bound}")?,
                    None => f.write_str("*")?,
                }
                write!(f, "{close}")
            }
            Query::And(clauses) => {
                f.write_str("(")?;
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" AND ")?;
                    }
                    clause.fmt(f)?;
                }
                f.write_str(")")
            }
        }
    }
}
