use std::sync::Arc;

use tokamak_common::{Result, error::Error};

use crate::document::{Document, FieldSet, FieldValue};
use crate::query::Query;
use crate::sort::{ResolvedSort, SortSpec};

/// A match's identity within a searcher's view, plus its sort keys.
///
/// Hits are the pagination currency: `search_after` resumes strictly after a
/// hit by comparing sort keys first and the stable doc id as the tie-break,
/// so a hit taken from one page is a valid cursor for the next.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Hit {
    doc: u64,
    sort_values: Vec<FieldValue>,
}

impl Hit {
    pub fn new(doc: u64, sort_values: Vec<FieldValue>) -> Hit {
        Hit { doc, sort_values }
    }

    pub fn doc(&self) -> u64 {
        self.doc
    }

    pub fn sort_values(&self) -> &[FieldValue] {
        &self.sort_values
    }
}

/// Read access to one consistent snapshot of an index.
///
/// A searcher's view never changes: writes that land after acquisition are
/// invisible until a fresh searcher is acquired.
pub trait Searcher: Send + Sync {
    /// Rewrites a sort against this snapshot.
    fn resolve_sort(&self, sort: &SortSpec) -> Result<ResolvedSort>;

    /// Returns up to `limit` hits matching `query` in `sort` order, strictly
    /// after `after` when one is given.
    fn search_after(
        &self,
        after: Option<&Hit>,
        query: &Query,
        sort: &ResolvedSort,
        limit: usize,
    ) -> Result<Vec<Hit>>;

    /// Loads a hit's stored fields, restricted to `fields`.
    fn doc(&self, doc: u64, fields: &FieldSet) -> Result<Document>;
}

/// Hands out searchers over the current index state and takes them back.
///
/// Every successful `acquire` must be balanced by exactly one `release`;
/// the engine may refresh or retire internal state only once outstanding
/// searchers come back.
pub trait SearcherSource: Send + Sync {
    fn acquire(&self) -> Result<Arc<dyn Searcher>>;

    fn release(&self, searcher: Arc<dyn Searcher>) -> Result<()>;
}

/// An acquired searcher bound to the source it came from.
///
/// Dropping the lease releases the searcher; a failure on the drop path is
/// logged rather than surfaced. [`SearcherLease::release`] is the
/// error-aware form. Either way the searcher goes back exactly once.
pub struct SearcherLease {
    source: Arc<dyn SearcherSource>,
    searcher: Arc<dyn Searcher>,
    released: bool,
}

impl SearcherLease {
    pub fn acquire(source: Arc<dyn SearcherSource>) -> Result<SearcherLease> {
        let searcher = source
            .acquire()
            .map_err(|e| Error::resource("Error acquiring index searcher", e))?;
        Ok(SearcherLease {
            source,
            searcher,
            released: false,
        })
    }

    pub fn searcher(&self) -> &Arc<dyn Searcher> {
        &self.searcher
    }

    /// Releases the searcher, surfacing the failure.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.source
            .release(self.searcher.clone())
            .map_err(|e| Error::resource("Error releasing index searcher", e))
    }
}

impl Drop for SearcherLease {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.source.release(self.searcher.clone()) {
            log::warn!("Error releasing index searcher: {e}");
        }
    }
}
