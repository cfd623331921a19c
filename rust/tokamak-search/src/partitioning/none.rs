//! The single-shard strategy.

use tokamak_ring::{RingToken, TokenRange};

/// Keeps the whole index in one shard.
///
/// Every token maps to shard zero and every non-empty restriction touches
/// it. This is the default for indexes small enough not to split.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct PartitionerOnNone;

impl PartitionerOnNone {
    pub fn new() -> PartitionerOnNone {
        PartitionerOnNone
    }

    pub fn num_partitions(&self) -> usize {
        1
    }

    pub fn partition_token(&self, _token: RingToken) -> usize {
        0
    }

    pub fn partitions_for(&self, range: &TokenRange) -> Vec<usize> {
        if range.is_empty() { Vec::new() } else { vec![0] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_lands_in_shard_zero() {
        let partitioner = PartitionerOnNone::new();
        assert_eq!(partitioner.num_partitions(), 1);
        for token in [RingToken::MINIMUM, RingToken::new(0), RingToken::new(i64::MAX)] {
            assert_eq!(partitioner.partition_token(token), 0);
        }

        assert_eq!(partitioner.partitions_for(&TokenRange::full()), vec![0]);

        let min = Some(RingToken::MINIMUM);
        let empty = TokenRange::new(min, min, false, false);
        assert!(partitioner.partitions_for(&empty).is_empty());
    }
}
