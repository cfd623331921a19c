use crate::key::DecoratedKey;
use crate::token::RingToken;

/// Kind of a ring position relative to the rows sharing its token.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum PositionKind {
    /// Sorts before every row with the same token.
    MinBound,
    /// The position of a row itself.
    RowKey,
    /// Sorts after every row with the same token.
    MaxBound,
}

/// A point on the ring, used to classify the endpoints of a row range.
///
/// Ranges handed down by the host store are bounded by positions rather than
/// bare tokens: a `MaxBound` start means "strictly after every row with this
/// token", a `MinBound` stop means "strictly before". Derived ordering is
/// token first, kind second.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RingPosition {
    token: RingToken,
    kind: PositionKind,
}

impl RingPosition {
    pub const fn min_of(token: RingToken) -> RingPosition {
        RingPosition {
            token,
            kind: PositionKind::MinBound,
        }
    }

    pub const fn max_of(token: RingToken) -> RingPosition {
        RingPosition {
            token,
            kind: PositionKind::MaxBound,
        }
    }

    pub fn of(key: &DecoratedKey) -> RingPosition {
        RingPosition {
            token: key.token(),
            kind: PositionKind::RowKey,
        }
    }

    pub const fn token(self) -> RingToken {
        self.token
    }

    pub const fn kind(self) -> PositionKind {
        self.kind
    }
}
