//! Cursor-based paginated retrieval.
//!
//! [`PaginatedSearcher`] walks the matches of one query in one sort order by
//! issuing bounded page searches against an acquired searcher, resuming each
//! page strictly after the last hit of the previous one. Peak memory is one
//! page of loaded documents regardless of result-set size, and a page that
//! comes back short of the requested size is the sole termination signal: no
//! extra round trip confirms exhaustion, and no further fetch is attempted
//! once a short page has been seen.
//!
//! The searcher lease is held for the iterator's whole life and released
//! exactly once, on [`PaginatedSearcher::close`] or on drop. A fetch failure
//! leaves the iterator unusable; the caller resumes, if at all, by opening a
//! fresh iterator from the last cursor.

use std::collections::VecDeque;
use std::sync::Arc;

use tokamak_common::{Result, error::Error, try_some, verify_arg};
use tokamak_index::document::{Document, FieldSet};
use tokamak_index::query::Query;
use tokamak_index::searcher::{Hit, SearcherLease, SearcherSource};
use tokamak_index::sort::{ResolvedSort, SortSpec};

/// Lazy iterator over the documents matching a query, fetched page by page.
///
/// Yields `Result<Document>` in the requested sort order. Errors are
/// terminal: after yielding one, the iterator returns `None` forever.
pub struct PaginatedSearcher {
    lease: SearcherLease,
    query: Query,
    resolved: ResolvedSort,
    fields: FieldSet,
    page_size: usize,
    after: Option<Hit>,
    buffer: VecDeque<Document>,
    may_have_more: bool,
}

impl PaginatedSearcher {
    /// Acquires a searcher and prepares iteration.
    ///
    /// The sort is resolved against the acquired searcher once, here, so
    /// every page of this iteration is ordered by the same resolved criteria.
    /// `after` resumes strictly after a previously returned cursor; `None`
    /// starts from the beginning of the result set.
    pub fn open(
        source: Arc<dyn SearcherSource>,
        query: Query,
        sort: SortSpec,
        after: Option<Hit>,
        page_size: usize,
        fields: FieldSet,
    ) -> Result<PaginatedSearcher> {
        verify_arg!(page_size, page_size > 0);
        let lease = SearcherLease::acquire(source)?;
        let resolved = match lease.searcher().resolve_sort(&sort) {
            Ok(resolved) => resolved,
            Err(e) => return Err(Error::search(query.to_string(), sort.to_string(), e)),
        };
        Ok(PaginatedSearcher {
            lease,
            query,
            resolved,
            fields,
            page_size,
            after,
            buffer: VecDeque::new(),
            may_have_more: true,
        })
    }

    /// The current resume point: the last hit of the last fetched page.
    ///
    /// Feeding this back into [`PaginatedSearcher::open`] continues the
    /// iteration after everything this iterator has fetched so far,
    /// including any documents still buffered and not yet yielded.
    pub fn cursor(&self) -> Option<&Hit> {
        self.after.as_ref()
    }

    /// Whether a further page fetch may still produce documents.
    ///
    /// False once a short page has been seen or a fetch has failed.
    pub fn may_have_more(&self) -> bool {
        self.may_have_more
    }

    /// Releases the searcher back to its source, surfacing the failure.
    ///
    /// Dropping the iterator releases as well; this form exists for callers
    /// that need to observe release errors.
    pub fn close(self) -> Result<()> {
        self.lease.release()
    }

    fn fetch(&mut self) -> Result<()> {
        match self.fetch_page() {
            Ok(()) => Ok(()),
            Err(e) => {
                self.may_have_more = false;
                Err(Error::search(self.query.to_string(), self.resolved.to_string(), e))
            }
        }
    }

    fn fetch_page(&mut self) -> Result<()> {
        let searcher = self.lease.searcher().clone();
        let hits = searcher.search_after(
            self.after.as_ref(),
            &self.query,
            &self.resolved,
            self.page_size,
        )?;
        log::debug!("fetched page of {} documents", hits.len());
        self.may_have_more = hits.len() == self.page_size;

        // Load the whole page before exposing any of it, so a failed load
        // leaves neither a partial page in the buffer nor an advanced cursor.
        let mut page = Vec::with_capacity(hits.len());
        for hit in &hits {
            page.push(searcher.doc(hit.doc(), &self.fields)?);
        }
        if let Some(last) = hits.into_iter().next_back() {
            self.after = Some(last);
        }
        self.buffer.extend(page);
        Ok(())
    }
}

impl Iterator for PaginatedSearcher {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Result<Document>> {
        if self.buffer.is_empty() && self.may_have_more {
            try_some!(self.fetch());
        }
        self.buffer.pop_front().map(Ok)
    }
}
