use crate::token::RingToken;

/// A restriction over the token ring.
///
/// `None` bounds are unbounded. A bound holding the ring-minimum sentinel is
/// interpreted the way the host store hands it down: on a single side it
/// means unbounded on that side, while a range with the sentinel on both
/// sides is the empty set unless both ends are inclusive, in which case it
/// spans the whole ring.
///
/// Ranges are non-wrapping by contract; the host store unwraps wraparound
/// ranges before they reach the index layer. [`TokenRange::unwrapped`] splits
/// a wraparound input into its non-wrapping pieces for shard intersection.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TokenRange {
    lower: Option<RingToken>,
    upper: Option<RingToken>,
    include_lower: bool,
    include_upper: bool,
}

impl TokenRange {
    pub const fn new(
        lower: Option<RingToken>,
        upper: Option<RingToken>,
        include_lower: bool,
        include_upper: bool,
    ) -> TokenRange {
        TokenRange {
            lower,
            upper,
            include_lower,
            include_upper,
        }
    }

    /// The unrestricted range.
    pub const fn full() -> TokenRange {
        TokenRange::new(None, None, true, true)
    }

    pub const fn lower(&self) -> Option<RingToken> {
        self.lower
    }

    pub const fn upper(&self) -> Option<RingToken> {
        self.upper
    }

    pub const fn include_lower(&self) -> bool {
        self.include_lower
    }

    pub const fn include_upper(&self) -> bool {
        self.include_upper
    }

    /// Whether this restriction matches nothing at all.
    ///
    /// True exactly for the both-sentinel range that is not inclusive on both
    /// ends. Callers short-circuit it without touching the index.
    pub fn is_empty(&self) -> bool {
        match (self.lower, self.upper) {
            (Some(lower), Some(upper)) if lower.is_minimum() && upper.is_minimum() => {
                !(self.include_lower && self.include_upper)
            }
            _ => false,
        }
    }

    /// Lower bound with the sentinel interpreted as unbounded.
    pub fn effective_lower(&self) -> Option<RingToken> {
        self.lower.filter(|token| !token.is_minimum())
    }

    /// Upper bound with the sentinel interpreted as unbounded.
    pub fn effective_upper(&self) -> Option<RingToken> {
        self.upper.filter(|token| !token.is_minimum())
    }

    /// Whether the effective bounds run backwards around the ring.
    pub fn is_wraparound(&self) -> bool {
        matches!(
            (self.effective_lower(), self.effective_upper()),
            (Some(lower), Some(upper)) if lower > upper
        )
    }

    /// Splits into non-wrapping pieces.
    ///
    /// The empty range yields no pieces; a non-wrapping range yields itself;
    /// a wraparound range yields the piece from its lower bound to the ring
    /// maximum followed by the piece from the ring minimum to its upper
    /// bound.
    pub fn unwrapped(self) -> Vec<TokenRange> {
        if self.is_empty() {
            return Vec::new();
        }
        if !self.is_wraparound() {
            return vec![self];
        }
        vec![
            TokenRange::new(self.effective_lower(), None, self.include_lower, true),
            TokenRange::new(None, self.effective_upper(), true, self.include_upper),
        ]
    }
}
