use std::fmt;
use std::sync::Arc;

/// One sort criterion: a doc-values field, ascending unless reversed.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SortField {
    field: Arc<str>,
    reverse: bool,
}

impl SortField {
    pub fn ascending(field: impl Into<Arc<str>>) -> SortField {
        SortField {
            field: field.into(),
            reverse: false,
        }
    }

    pub fn descending(field: impl Into<Arc<str>>) -> SortField {
        SortField {
            field: field.into(),
            reverse: true,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn is_reverse(&self) -> bool {
        self.reverse
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.field)?;
        if self.reverse {
            f.write_str("!")?;
        }
        Ok(())
    }
}

/// A requested sort order, applied criterion by criterion with the stable
/// doc id as the final tie-break. Empty means doc-id order.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct SortSpec {
    fields: Vec<SortField>,
}

impl SortSpec {
    pub fn new(fields: Vec<SortField>) -> SortSpec {
        SortSpec { fields }
    }

    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_sort(&self.fields, f)
    }
}

/// A sort rewritten against a concrete searcher.
///
/// Resolution pins the criteria the engine will actually apply for the
/// lifetime of one lease; the pagination layer resolves once and reuses the
/// result for every page so pages of one iteration cannot disagree on order.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ResolvedSort {
    fields: Vec<SortField>,
}

impl ResolvedSort {
    pub fn new(fields: Vec<SortField>) -> ResolvedSort {
        ResolvedSort { fields }
    }

    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }
}

impl fmt::Display for ResolvedSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_sort(&self.fields, f)
    }
}

fn render_sort(fields: &[SortField], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if fields.is_empty() {
        return f.write_str("<doc>");
    }
    f.write_str("<")?;
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{field}")?;
    }
    f.write_str(">")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_orders_render_compactly() {
        assert_eq!(SortSpec::default().to_string(), "<doc>");
        assert_eq!(
            SortSpec::new(vec![SortField::ascending("rank")]).to_string(),
            "<rank>"
        );
        assert_eq!(
            SortSpec::new(vec![
                SortField::ascending("rank"),
                SortField::descending("name"),
            ])
            .to_string(),
            "<rank,name!>"
        );
    }

    #[test]
    fn resolved_sorts_render_identically() {
        let fields = vec![SortField::ascending("rank"), SortField::ascending("name")];
        assert_eq!(
            ResolvedSort::new(fields.clone()).to_string(),
            SortSpec::new(fields).to_string()
        );
        assert_eq!(ResolvedSort::new(Vec::new()).to_string(), "<doc>");
    }
}
