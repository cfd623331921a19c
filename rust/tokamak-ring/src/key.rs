use std::cmp::Ordering;
use std::sync::Arc;

use crate::token::RingToken;

/// A raw partition key paired with its ring token.
///
/// Ordering is the store's global row order: token first, then raw key bytes
/// ascending as the tie-break for token collisions.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct DecoratedKey {
    key: Arc<[u8]>,
    token: RingToken,
}

impl DecoratedKey {
    pub fn decorate(key: impl Into<Arc<[u8]>>) -> DecoratedKey {
        let key = key.into();
        let token = RingToken::from_key(&key);
        DecoratedKey { key, token }
    }

    /// Pairs a key with an already-known token, skipping the hash.
    pub fn with_token(key: impl Into<Arc<[u8]>>, token: RingToken) -> DecoratedKey {
        DecoratedKey {
            key: key.into(),
            token,
        }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn token(&self) -> RingToken {
        self.token
    }
}

impl Ord for DecoratedKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.token
            .cmp(&other.token)
            .then_with(|| self.key.as_ref().cmp(other.key.as_ref()))
    }
}

impl PartialOrd for DecoratedKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
