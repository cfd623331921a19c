//! Token-arc partitioning: the ring divided into contiguous shards.

use std::path::PathBuf;

use tokamak_common::{Result, error::Error};
use tokamak_ring::{RingToken, TokenRange};

/// Splits the ring into `partitions` contiguous arcs of near-equal width.
///
/// Boundary `i` sits at unsigned offset `floor(i * 2^64 / N)` from the ring
/// minimum; shard `i` owns the tokens in `[boundary[i], boundary[i + 1])`,
/// with the last shard closed at the ring maximum. The boundary table is
/// computed eagerly at construction and assignment is a binary search over
/// it, so adjacent shards differ in width by at most one token and a token
/// sitting exactly on a boundary belongs to the shard the boundary opens.
///
/// Rows with neighboring tokens land in the same shard, which is what makes
/// token-range reads (ownership handoff, range repair, restricted searches)
/// touch few shards instead of all of them.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PartitionerOnToken {
    partitions: usize,
    boundaries: Vec<u64>,
    paths: Option<Vec<PathBuf>>,
}

impl PartitionerOnToken {
    /// Builds a partitioner over `partitions` shards, optionally pinning one
    /// directory per shard.
    ///
    /// Fails when `partitions` is not strictly positive, or when a path list
    /// is supplied whose length differs from `partitions`.
    pub fn new(partitions: i32, paths: Option<Vec<PathBuf>>) -> Result<PartitionerOnToken> {
        if partitions <= 0 {
            return Err(Error::invalid_config(format!(
                "The number of partitions should be strictly positive but found {partitions}"
            )));
        }
        let partitions = partitions as usize;
        if let Some(paths) = &paths {
            if paths.len() != partitions {
                return Err(Error::invalid_config(
                    "The paths size must be equal to number of partitions",
                ));
            }
        }

        let width = 1u128 << 64;
        let boundaries = (0..partitions as u128)
            .map(|i| ((i * width) / partitions as u128) as u64)
            .collect();
        Ok(PartitionerOnToken {
            partitions,
            boundaries,
            paths,
        })
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions
    }

    /// Shard owning the given token.
    pub fn partition_token(&self, token: RingToken) -> usize {
        let offset = token.offset();
        // boundaries[0] is zero, so at least one entry satisfies the
        // predicate for any offset.
        self.boundaries.partition_point(|&boundary| boundary <= offset) - 1
    }

    /// Shards intersecting the restriction, in ring order from its lower
    /// bound; a wraparound restriction contributes its upper arc first.
    pub fn partitions_for(&self, range: &TokenRange) -> Vec<usize> {
        let mut shards = Vec::new();
        for piece in range.unwrapped() {
            let first = piece
                .effective_lower()
                .map_or(0, |token| self.partition_token(token));
            let last = piece
                .effective_upper()
                .map_or(self.partitions - 1, |token| self.partition_token(token));
            shards.extend(first..=last);
        }
        shards
    }

    /// Per-shard directories, in the order they were supplied.
    pub fn partition_paths(&self) -> Option<&[PathBuf]> {
        self.paths.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(key: &str) -> RingToken {
        RingToken::from_key(key.as_bytes())
    }

    #[test]
    fn boundaries_cover_the_ring_without_gaps() {
        let partitioner = PartitionerOnToken::new(7, None).expect("partitioner");
        assert_eq!(partitioner.boundaries.len(), 7);
        assert_eq!(partitioner.boundaries[0], 0);
        assert!(partitioner.boundaries.windows(2).all(|w| w[0] < w[1]));

        // Rounding-sensitive assignments for a shard count that does not
        // divide the ring width evenly.
        assert_eq!(partitioner.partition_token(token("key1")), 4);
        assert_eq!(partitioner.partition_token(token("key2")), 6);
        assert_eq!(partitioner.partition_token(token("key3")), 6);
        assert_eq!(partitioner.partition_token(RingToken::MINIMUM), 0);
        assert_eq!(partitioner.partition_token(RingToken::new(i64::MAX)), 6);
    }

    #[test]
    fn paths_are_optional_but_counted() {
        assert!(PartitionerOnToken::new(2, None).is_ok());

        let err = PartitionerOnToken::new(2, Some(vec![PathBuf::from("/only")]))
            .expect_err("size mismatch");
        assert_eq!(
            err.to_string(),
            "The paths size must be equal to number of partitions"
        );
    }
}
