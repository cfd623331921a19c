use std::fmt;

use crate::murmur3;

/// Position of a partition key in the 64-bit token ring.
///
/// Tokens carry the host store's row order. The minimum value doubles as the
/// ring-minimum sentinel in range bounds; [`RingToken::from_key`] never
/// produces it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RingToken(i64);

impl RingToken {
    /// The ring-minimum sentinel.
    pub const MINIMUM: RingToken = RingToken(i64::MIN);

    pub const fn new(value: i64) -> RingToken {
        RingToken(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    pub const fn is_minimum(self) -> bool {
        self.0 == i64::MIN
    }

    /// Hashes a raw partition key to its token.
    ///
    /// First 64-bit half of the Murmur3 x64_128 variant (seed 0), with the
    /// minimum value normalized to the maximum so that `MINIMUM` stays
    /// reserved for bounds.
    pub fn from_key(key: &[u8]) -> RingToken {
        let (h1, _) = murmur3::hash3_x64_128(key, 0);
        match h1 as i64 {
            i64::MIN => RingToken(i64::MAX),
            token => RingToken(token),
        }
    }

    /// Unsigned distance of this token from the ring minimum.
    pub const fn offset(self) -> u64 {
        (self.0 as u64).wrapping_add(1u64 << 63)
    }
}

impl fmt::Display for RingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Hash scheme of the host store's ring.
///
/// Token derivation is only defined for `Murmur3`; components that encode
/// tokens reject the other schemes at construction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RingScheme {
    Murmur3,
    ByteOrdered,
    OrderPreserving,
    Random,
    Local,
}

impl RingScheme {
    pub const fn name(self) -> &'static str {
        match self {
            RingScheme::Murmur3 => "murmur3",
            RingScheme::ByteOrdered => "byte_ordered",
            RingScheme::OrderPreserving => "order_preserving",
            RingScheme::Random => "random",
            RingScheme::Local => "local",
        }
    }

    pub const fn is_murmur3(self) -> bool {
        matches!(self, RingScheme::Murmur3)
    }
}

impl fmt::Display for RingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
