//! In-process index engine over snapshot state.
//!
//! Matching is a scan, not an inverted index: the point of this engine is to
//! give the retrieval layers honest searcher semantics (stable snapshots,
//! balanced leases, resolved sorts) with counters that make lease balance and
//! page-fetch behavior observable.

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use tokamak_common::{Result, error::Error};

use crate::document::{Document, FieldSet, FieldValue};
use crate::query::Query;
use crate::searcher::{Hit, Searcher, SearcherSource};
use crate::sort::{ResolvedSort, SortSpec};

/// In-memory index engine.
///
/// `insert` assigns doc ids in insertion order. An acquired searcher sees the
/// state as of acquisition and stays stable across later inserts.
#[derive(Default)]
pub struct MemoryIndex {
    state: RwLock<Arc<Vec<Document>>>,
    counters: Arc<Counters>,
}

#[derive(Default)]
struct Counters {
    leased: AtomicUsize,
    searches: AtomicUsize,
}

impl MemoryIndex {
    pub fn new() -> MemoryIndex {
        MemoryIndex::default()
    }

    /// Adds a document, returning its doc id.
    pub fn insert(&self, document: Document) -> u64 {
        let mut guard = match self.state.write() {
            Ok(guard) => guard,
            // State is a plain vector; a panicked writer cannot leave it
            // half-updated in a way readers would observe.
            Err(poisoned) => poisoned.into_inner(),
        };
        let docs = Arc::make_mut(&mut *guard);
        docs.push(document);
        (docs.len() - 1) as u64
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of currently outstanding searcher leases.
    pub fn leased(&self) -> usize {
        self.counters.leased.load(Ordering::Acquire)
    }

    /// Number of page searches executed across all searchers.
    pub fn search_count(&self) -> usize {
        self.counters.searches.load(Ordering::Acquire)
    }

    fn snapshot(&self) -> Arc<Vec<Document>> {
        let guard = match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.clone()
    }
}

impl SearcherSource for MemoryIndex {
    fn acquire(&self) -> Result<Arc<dyn Searcher>> {
        let docs = self.snapshot();
        self.counters.leased.fetch_add(1, Ordering::AcqRel);
        Ok(Arc::new(MemorySearcher {
            docs,
            counters: self.counters.clone(),
        }))
    }

    fn release(&self, _searcher: Arc<dyn Searcher>) -> Result<()> {
        self.counters
            .leased
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .map_err(|_| Error::invalid_arg("searcher", "release without matching acquire"))?;
        Ok(())
    }
}

struct MemorySearcher {
    docs: Arc<Vec<Document>>,
    counters: Arc<Counters>,
}

impl Searcher for MemorySearcher {
    fn resolve_sort(&self, sort: &SortSpec) -> Result<ResolvedSort> {
        Ok(ResolvedSort::new(sort.fields().to_vec()))
    }

    fn search_after(
        &self,
        after: Option<&Hit>,
        query: &Query,
        sort: &ResolvedSort,
        limit: usize,
    ) -> Result<Vec<Hit>> {
        self.counters.searches.fetch_add(1, Ordering::AcqRel);

        let mut matched = Vec::new();
        for (id, doc) in self.docs.iter().enumerate() {
            if !query.matches(doc) {
                continue;
            }
            matched.push(Hit::new(id as u64, sort_key(doc, sort, id)?));
        }
        matched.sort_by(|a, b| compare_hits(a, b, sort));

        let start = match after {
            None => 0,
            Some(after) => matched
                .partition_point(|hit| compare_hits(hit, after, sort) != CmpOrdering::Greater),
        };
        Ok(matched.into_iter().skip(start).take(limit).collect())
    }

    fn doc(&self, doc: u64, fields: &FieldSet) -> Result<Document> {
        let stored = self
            .docs
            .get(doc as usize)
            .ok_or_else(|| Error::invalid_arg("doc", format!("unknown doc id {doc}")))?;
        let mut out = Document::new();
        for field in stored.fields() {
            if field.is_stored() && fields.contains(field.name()) {
                out.add(field.clone());
            }
        }
        Ok(out)
    }
}

/// Strict sort-key extraction: a matching document missing a doc-values
/// field named by the sort is an error rather than a silent missing-value.
fn sort_key(doc: &Document, sort: &ResolvedSort, id: usize) -> Result<Vec<FieldValue>> {
    sort.fields()
        .iter()
        .map(|sf| {
            doc.fields()
                .iter()
                .find(|f| f.has_doc_values() && f.name() == sf.field())
                .map(|f| f.value().clone())
                .ok_or_else(|| {
                    Error::invalid_arg(
                        "sort",
                        format!("document {id} has no doc values for field '{}'", sf.field()),
                    )
                })
        })
        .collect()
}

fn compare_hits(a: &Hit, b: &Hit, sort: &ResolvedSort) -> CmpOrdering {
    for (i, field) in sort.fields().iter().enumerate() {
        let ord = a.sort_values().get(i).cmp(&b.sort_values().get(i));
        let ord = if field.is_reverse() { ord.reverse() } else { ord };
        if ord != CmpOrdering::Equal {
            return ord;
        }
    }
    a.doc().cmp(&b.doc())
}
