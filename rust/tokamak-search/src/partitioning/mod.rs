//! Shard partitioning of an index by ring token.
//!
//! Large indexes are split into a fixed number of independently searchable
//! shards. A partitioner decides, purely from a row's token, which shard the
//! row lives in, and conversely which shards a token restriction can touch,
//! so reads fan out to the smallest shard set that covers the restriction.
//!
//! Two strategies exist: [`PartitionerOnNone`] keeps everything in a single
//! shard, and [`PartitionerOnToken`] splits the ring into contiguous arcs.
//! A partitioner is described by a compact JSON descriptor, e.g.
//! `{"type":"none"}` or `{"type":"token","partitions":4,"paths":[...]}`,
//! and reconstructing a partitioner from its descriptor yields an equal one.

pub mod none;
pub mod on_token;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokamak_common::{Result, error::Error};
use tokamak_ring::{DecoratedKey, RingToken, TokenRange};

pub use none::PartitionerOnNone;
pub use on_token::PartitionerOnToken;

/// Strategy assigning rows to index shards.
///
/// Shard assignment is a pure function of the row token, fixed at
/// construction; topology changes mean building a new partitioner.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Partitioner {
    None(PartitionerOnNone),
    Token(PartitionerOnToken),
}

impl Partitioner {
    /// The single-shard strategy.
    pub fn on_none() -> Partitioner {
        Partitioner::None(PartitionerOnNone::new())
    }

    /// The token-arc strategy with `partitions` shards and optional per-shard
    /// directories.
    pub fn on_token(partitions: i32, paths: Option<Vec<PathBuf>>) -> Result<Partitioner> {
        Ok(Partitioner::Token(PartitionerOnToken::new(partitions, paths)?))
    }

    pub fn num_partitions(&self) -> usize {
        match self {
            Partitioner::None(p) => p.num_partitions(),
            Partitioner::Token(p) => p.num_partitions(),
        }
    }

    /// Shard holding the given row.
    pub fn partition(&self, key: &DecoratedKey) -> usize {
        self.partition_token(key.token())
    }

    /// Shard owning the given token.
    pub fn partition_token(&self, token: RingToken) -> usize {
        match self {
            Partitioner::None(p) => p.partition_token(token),
            Partitioner::Token(p) => p.partition_token(token),
        }
    }

    /// Shards a token restriction can touch, in ring order starting from the
    /// restriction's lower bound.
    ///
    /// The empty restriction touches no shard. The selection may include an
    /// edge shard whose overlap is only an excluded endpoint; extra shards
    /// simply contribute no rows.
    pub fn partitions_for(&self, range: &TokenRange) -> Vec<usize> {
        match self {
            Partitioner::None(p) => p.partitions_for(range),
            Partitioner::Token(p) => p.partitions_for(range),
        }
    }

    /// Per-shard directories, present iff the descriptor carried them.
    pub fn partition_paths(&self) -> Option<&[PathBuf]> {
        match self {
            Partitioner::None(_) => None,
            Partitioner::Token(p) => p.partition_paths(),
        }
    }

    /// Parses a JSON descriptor, applying the same validation as direct
    /// construction.
    pub fn from_json(json: &str) -> Result<Partitioner> {
        let descriptor: Descriptor = serde_json::from_str(json)?;
        descriptor.try_into()
    }

    /// Serializes this partitioner as its JSON descriptor.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&Descriptor::from(self))?)
    }
}

impl Default for Partitioner {
    fn default() -> Partitioner {
        Partitioner::on_none()
    }
}

/// Wire form of a partitioner, tagged by strategy.
///
/// Kept separate from [`Partitioner`] so deserialization funnels through the
/// validating constructors instead of bypassing them.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Descriptor {
    None,
    Token {
        partitions: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        paths: Option<Vec<PathBuf>>,
    },
}

impl TryFrom<Descriptor> for Partitioner {
    type Error = Error;

    fn try_from(descriptor: Descriptor) -> Result<Partitioner> {
        match descriptor {
            Descriptor::None => Ok(Partitioner::on_none()),
            Descriptor::Token { partitions, paths } => Partitioner::on_token(partitions, paths),
        }
    }
}

impl From<&Partitioner> for Descriptor {
    fn from(partitioner: &Partitioner) -> Descriptor {
        match partitioner {
            Partitioner::None(_) => Descriptor::None,
            Partitioner::Token(p) => Descriptor::Token {
                partitions: p.num_partitions() as i32,
                paths: p.partition_paths().map(<[PathBuf]>::to_vec),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_without_paths_serialize_compactly() {
        let partitioner = Partitioner::on_token(4, None).expect("partitioner");
        assert_eq!(
            partitioner.to_json().expect("json"),
            r#"{"type":"token","partitions":4}"#
        );

        assert_eq!(
            Partitioner::on_none().to_json().expect("json"),
            r#"{"type":"none"}"#
        );
    }

    #[test]
    fn unknown_descriptor_types_are_rejected() {
        assert!(Partitioner::from_json(r#"{"type":"column"}"#).is_err());
        assert!(Partitioner::from_json(r#"{"partitions":4}"#).is_err());
        assert!(Partitioner::from_json("not json").is_err());
    }

    #[test]
    fn parsing_applies_constructor_validation() {
        let err = Partitioner::from_json(r#"{"type":"token","partitions":0}"#)
            .expect_err("zero partitions");
        assert_eq!(
            err.to_string(),
            "The number of partitions should be strictly positive but found 0"
        );
    }

    #[test]
    fn the_default_strategy_is_a_single_shard() {
        let partitioner = Partitioner::default();
        assert_eq!(partitioner.num_partitions(), 1);
        assert!(partitioner.partition_paths().is_none());
    }
}
