//! One logical search fanned out across the shards of a partitioned index.
//!
//! The coordinator owns the read side of one partitioned index: the
//! partitioner that splits the ring and one searcher source per shard.
//! [`SearchCoordinator::search`] compiles the token restriction, opens a
//! paginated iterator on every shard the restriction touches and returns a
//! lazy k-way merge that interleaves the shard streams back into global ring
//! order. Shards whose token span cannot intersect the restriction are never
//! touched: no lease, no index call.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use tokamak_common::{Result, error::Error, try_some, verify_arg};
use tokamak_index::document::{Document, FieldSet};
use tokamak_index::query::Query;
use tokamak_index::searcher::SearcherSource;
use tokamak_ring::{DecoratedKey, RingScheme, TokenRange};

use crate::key_field::KeyField;
use crate::paginated::PaginatedSearcher;
use crate::partitioning::Partitioner;
use crate::token_field::TokenField;

/// One logical search: the user query plus the retrieval knobs the
/// coordinator needs to run it.
#[derive(Clone, Debug)]
pub struct SearchRequest {
    /// Query every returned row must match.
    pub query: Query,
    /// Token restriction; `None` searches the whole ring.
    pub range: Option<TokenRange>,
    /// Page size for every per-shard fetch.
    pub page_size: usize,
    /// Stored fields to load per row. The partition-key field is always
    /// loaded on top of these.
    pub fields: FieldSet,
}

impl SearchRequest {
    pub fn new(query: Query, page_size: usize) -> SearchRequest {
        SearchRequest {
            query,
            range: None,
            page_size,
            fields: FieldSet::default(),
        }
    }

    pub fn with_range(mut self, range: TokenRange) -> SearchRequest {
        self.range = Some(range);
        self
    }

    pub fn with_fields(mut self, fields: FieldSet) -> SearchRequest {
        self.fields = fields;
        self
    }
}

/// One merged row: where it came from, its recovered key and its loaded
/// fields.
#[derive(Clone, Debug)]
pub struct SearchRecord {
    /// Index of the shard that produced the row.
    pub partition: usize,
    /// The row's decorated key, recovered from the stored key field.
    pub key: DecoratedKey,
    /// The row's loaded stored fields.
    pub document: Document,
}

/// Executes searches across all shards of one partitioned index.
pub struct SearchCoordinator {
    token_field: TokenField,
    key_field: KeyField,
    partitioner: Partitioner,
    shards: Vec<Arc<dyn SearcherSource>>,
}

impl SearchCoordinator {
    /// Builds a coordinator over one searcher source per shard.
    ///
    /// The ring scheme is validated the same way the write path validates it,
    /// and the shard set must line up with the partitioner one to one.
    pub fn new(
        scheme: RingScheme,
        partitioner: Partitioner,
        shards: Vec<Arc<dyn SearcherSource>>,
    ) -> Result<SearchCoordinator> {
        let token_field = TokenField::new(scheme)?;
        if shards.len() != partitioner.num_partitions() {
            return Err(Error::invalid_config(
                "The shards size must be equal to number of partitions",
            ));
        }
        Ok(SearchCoordinator {
            token_field,
            key_field: KeyField::new(),
            partitioner,
            shards,
        })
    }

    pub fn partitioner(&self) -> &Partitioner {
        &self.partitioner
    }

    pub fn num_partitions(&self) -> usize {
        self.partitioner.num_partitions()
    }

    /// Starts one logical search and returns the merged result iterator.
    ///
    /// An empty token restriction yields the empty iterator without touching
    /// any shard. Otherwise one paginated iterator is opened per target shard;
    /// when a later shard fails to open, the leases already acquired go back
    /// on the failure path.
    pub fn search(&self, request: SearchRequest) -> Result<ShardMerge> {
        verify_arg!(page_size, request.page_size > 0);

        let (token_query, targets) = match &request.range {
            None => (None, (0..self.shards.len()).collect::<Vec<_>>()),
            Some(range) => match self.token_field.range_query(range) {
                None => {
                    log::debug!("empty token restriction; searching no shards");
                    return Ok(ShardMerge::empty());
                }
                Some(query) => (Some(query), self.partitioner.partitions_for(range)),
            },
        };

        let query = Query::conjunction([request.query].into_iter().chain(token_query));
        let sort = self.token_field.sort_fields();
        let mut fields = request.fields;
        fields.insert(KeyField::FIELD_NAME.into());

        log::debug!(
            "searching {} of {} shards with {query} and {sort}",
            targets.len(),
            self.shards.len()
        );

        let mut streams = Vec::with_capacity(targets.len());
        for partition in targets {
            let iter = PaginatedSearcher::open(
                self.shards[partition].clone(),
                query.clone(),
                sort.clone(),
                None,
                request.page_size,
                fields.clone(),
            )?;
            streams.push(ShardStream { partition, iter });
        }
        Ok(ShardMerge::new(self.key_field, streams))
    }
}

struct ShardStream {
    partition: usize,
    iter: PaginatedSearcher,
}

struct MergeEntry {
    key: DecoratedKey,
    partition: usize,
    slot: usize,
    document: Document,
}

impl Ord for MergeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the maximum; reversed so pops come out in ring
        // order, shard index as the deterministic tie-break.
        self.key
            .cmp(&other.key)
            .then_with(|| self.partition.cmp(&other.partition))
            .reverse()
    }
}

impl PartialOrd for MergeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MergeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MergeEntry {}

/// Lazy k-way merge of per-shard result streams into global ring order.
///
/// The first `next()` primes one record per shard; after that each call
/// refills only from the shard whose record was yielded last, so at most one
/// record per shard is buffered beyond the per-shard page buffers. Refilling
/// is deferred to the call after the yield: a record already popped is never
/// lost to a refill failure. An upstream error is yielded once and the merge
/// becomes unusable, yielding `None` from then on.
pub struct ShardMerge {
    key_field: KeyField,
    streams: Vec<ShardStream>,
    heap: BinaryHeap<MergeEntry>,
    pending: Option<usize>,
    primed: bool,
    failed: bool,
}

impl ShardMerge {
    fn new(key_field: KeyField, streams: Vec<ShardStream>) -> ShardMerge {
        ShardMerge {
            key_field,
            streams,
            heap: BinaryHeap::new(),
            pending: None,
            primed: false,
            failed: false,
        }
    }

    /// The merge over no shards at all.
    pub fn empty() -> ShardMerge {
        ShardMerge::new(KeyField::new(), Vec::new())
    }

    /// Number of shard streams this merge reads from.
    pub fn fan_out(&self) -> usize {
        self.streams.len()
    }

    /// Closes every shard iterator, surfacing the first failure.
    ///
    /// All iterators are closed even when an early one fails; dropping the
    /// merge releases them as well, with failures logged instead.
    pub fn close(self) -> Result<()> {
        let mut result = Ok(());
        for stream in self.streams {
            if let Err(e) = stream.iter.close() {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    fn refill(&mut self, slot: usize) -> Result<()> {
        let Some(next) = self.streams[slot].iter.next() else {
            return Ok(());
        };
        let entry = next.and_then(|document| {
            let key = self.key_field.decorated_key(&document)?;
            Ok(MergeEntry {
                key,
                partition: self.streams[slot].partition,
                slot,
                document,
            })
        });
        match entry {
            Ok(entry) => {
                self.heap.push(entry);
                Ok(())
            }
            Err(e) => {
                self.failed = true;
                Err(e)
            }
        }
    }
}

impl Iterator for ShardMerge {
    type Item = Result<SearchRecord>;

    fn next(&mut self) -> Option<Result<SearchRecord>> {
        if self.failed {
            return None;
        }
        if !self.primed {
            self.primed = true;
            for slot in 0..self.streams.len() {
                try_some!(self.refill(slot));
            }
        }
        if let Some(slot) = self.pending.take() {
            try_some!(self.refill(slot));
        }
        let entry = self.heap.pop()?;
        self.pending = Some(entry.slot);
        Some(Ok(SearchRecord {
            partition: entry.partition,
            key: entry.key,
            document: entry.document,
        }))
    }
}
