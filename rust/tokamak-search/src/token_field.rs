//! The reserved token field: how a row's ring position enters its index
//! document.
//!
//! Every indexed row carries its token under [`TokenField::FIELD_NAME`] as a
//! numeric doc-values field. That single field is what makes the index
//! ring-aware: searches can be restricted to a [`TokenRange`] with a numeric
//! range query, and results can be sorted into ring order with a single
//! ascending sort over it.
//!
//! The encoding must preserve token order bit for bit, since range bounds and
//! sort comparisons happen on encoded values inside the engine. Tokens are
//! signed 64-bit values with `i64` order, so the encoding is the identity;
//! the codec still owns both directions so nothing else in the crate assumes
//! that.

use std::cmp::Ordering;

use tokamak_common::{Result, error::Error};
use tokamak_index::document::{Document, Field};
use tokamak_index::query::Query;
use tokamak_index::sort::{SortField, SortSpec};
use tokamak_ring::{DecoratedKey, PositionKind, RingPosition, RingScheme, RingToken, TokenRange};

/// Codec between ring tokens and the reserved numeric index field.
///
/// Construction validates the host ring scheme: token encoding relies on the
/// murmur3 ring's total `i64` order with a global minimum, so any other
/// scheme is a configuration error, reported here and not at first query.
#[derive(Clone, Copy, Debug)]
pub struct TokenField {
    scheme: RingScheme,
}

impl TokenField {
    /// Name of the reserved token field.
    pub const FIELD_NAME: &'static str = "_token";

    pub fn new(scheme: RingScheme) -> Result<TokenField> {
        if !scheme.is_murmur3() {
            return Err(Error::invalid_config(format!(
                "Only the murmur3 ring scheme is supported but found {scheme}"
            )));
        }
        Ok(TokenField { scheme })
    }

    pub fn scheme(&self) -> RingScheme {
        self.scheme
    }

    /// Order-preserving encoding of a token as the indexed field value.
    pub const fn encode(&self, token: RingToken) -> i64 {
        token.value()
    }

    /// Exact inverse of [`TokenField::encode`].
    pub const fn decode(&self, value: i64) -> RingToken {
        RingToken::new(value)
    }

    /// Adds the token field for `key` to a document under construction.
    ///
    /// The field is indexed and carries doc values for sorting and range
    /// filtering; the raw value is recovered by hashing the stored key, so it
    /// is not stored for retrieval.
    pub fn add_fields(&self, document: &mut Document, key: &DecoratedKey) {
        let value = self.encode(key.token());
        document.add(Field::new(Self::FIELD_NAME, value, false, true, true));
    }

    /// Query matching exactly the rows with the given token.
    pub fn query_token(&self, token: RingToken) -> Query {
        let value = self.encode(token);
        Query::NumericRange {
            field: Self::FIELD_NAME.into(),
            lower: Some(value),
            upper: Some(value),
            include_lower: true,
            include_upper: true,
        }
    }

    /// Compiles a token restriction into a range query over the token field.
    ///
    /// `None` means the restriction matches nothing at all; callers must
    /// yield zero rows without touching the index. That happens exactly for
    /// the both-sentinel range that is not inclusive on both ends. A sentinel
    /// on one side only is an open bound, and the both-sentinel inclusive
    /// range is the genuine full ring, so both compile to real queries with
    /// the matching side left unbounded.
    pub fn range_query(&self, range: &TokenRange) -> Option<Query> {
        if range.is_empty() {
            return None;
        }
        Some(Query::NumericRange {
            field: Self::FIELD_NAME.into(),
            lower: range.effective_lower().map(|token| self.encode(token)),
            upper: range.effective_upper().map(|token| self.encode(token)),
            include_lower: range.include_lower(),
            include_upper: range.include_upper(),
        })
    }

    /// Whether a row range starting at `position` includes the rows sharing
    /// its token.
    ///
    /// A `MaxBound` start sorts after every row with its token, so those rows
    /// are excluded; `MinBound` and row starts include them.
    pub fn includes_start(&self, position: &RingPosition) -> bool {
        position.kind() != PositionKind::MaxBound
    }

    /// Whether a row range stopping at `position` includes the rows sharing
    /// its token.
    pub fn includes_stop(&self, position: &RingPosition) -> bool {
        position.kind() != PositionKind::MinBound
    }

    /// The single ascending sort over the token field that realizes ring
    /// order in the index.
    pub fn sort_fields(&self) -> SortSpec {
        SortSpec::new(vec![SortField::ascending(Self::FIELD_NAME)])
    }

    /// The store's global row order: token first, raw key bytes on ties.
    pub fn compare(&self, left: &DecoratedKey, right: &DecoratedKey) -> Ordering {
        left.cmp(right)
    }
}
