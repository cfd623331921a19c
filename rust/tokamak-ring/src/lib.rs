//! Ring model of a token-partitioned store: the Murmur3 token function,
//! decorated keys, ring positions and token-range restrictions.
//!
//! Rows of the host store live on a 64-bit hash ring. Everything in this
//! crate is pure computation over that ring; the index-facing encoding of
//! tokens lives in `tokamak-search`.

mod murmur3;

pub mod key;
pub mod position;
pub mod range;
pub mod token;

pub use key::DecoratedKey;
pub use position::{PositionKind, RingPosition};
pub use range::TokenRange;
pub use token::{RingScheme, RingToken};
