//! The reserved partition-key field.
//!
//! Alongside its token, every indexed row stores its raw partition key under
//! [`KeyField::FIELD_NAME`]. The shard merge recovers a [`DecoratedKey`] from
//! that field to key the cross-shard ordering, so retrieval layers force it
//! into every field projection they load.

use tokamak_common::{Result, error::Error};
use tokamak_index::document::{Document, Field, FieldValue};
use tokamak_ring::DecoratedKey;

/// Codec between decorated keys and the stored partition-key field.
///
/// Only the raw key bytes are stored; the token side of the decorated key is
/// recomputed by hashing on the way out, which keeps the stored form minimal
/// and immune to codec drift between the two fields.
#[derive(Clone, Copy, Default, Debug)]
pub struct KeyField;

impl KeyField {
    /// Name of the reserved partition-key field.
    pub const FIELD_NAME: &'static str = "_partition_key";

    pub fn new() -> KeyField {
        KeyField
    }

    /// Adds the stored key field for `key` to a document under construction.
    pub fn add_fields(&self, document: &mut Document, key: &DecoratedKey) {
        document.add(Field::stored(Self::FIELD_NAME, key.key().to_vec()));
    }

    /// Recovers the decorated key from a loaded document.
    ///
    /// Fails when the document was loaded without the key field in its
    /// projection, which is a caller error rather than a data error.
    pub fn decorated_key(&self, document: &Document) -> Result<DecoratedKey> {
        match document.value(Self::FIELD_NAME) {
            Some(FieldValue::Bytes(key)) => Ok(DecoratedKey::decorate(key.clone())),
            Some(other) => Err(Error::invalid_arg(
                "document",
                format!(
                    "field '{}' holds {other} instead of raw key bytes",
                    Self::FIELD_NAME
                ),
            )),
            None => Err(Error::invalid_arg(
                "document",
                format!("no stored '{}' field to recover the key from", Self::FIELD_NAME),
            )),
        }
    }
}
