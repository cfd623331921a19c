//! Secondary-index search layer for a token-partitioned store.
//!
//! Rows of the host store live on a 64-bit hash ring; this crate is what
//! makes an index aware of that ring. The token field codec writes each
//! row's token into its index document, the partitioner splits an index into
//! shards by token span, paginated retrieval walks matches cursor by cursor,
//! and the coordinator fans a search out to the shards a token restriction
//! touches and merges the streams back in ring order.

pub mod coordinator;
pub mod key_field;
pub mod paginated;
pub mod partitioning;
pub mod schema;
pub mod token_field;

pub use coordinator::{SearchCoordinator, SearchRecord, SearchRequest, ShardMerge};
pub use key_field::KeyField;
pub use paginated::PaginatedSearcher;
pub use partitioning::{Partitioner, PartitionerOnNone, PartitionerOnToken};
pub use schema::{
    Column, ColumnDefinition, ColumnType, ColumnValue, Columns, Mapper, TableSchema, TextMapper,
};
pub use token_field::TokenField;
