//! Error types for the collection layer.
//!
//! These are the semantic errors: argument validation, collection-contract
//! violations, codec failures, and re-typed server reports. Transport-level
//! errors from the store pass through unchanged inside [`CacheError::Store`].

use farcache_store::StoreError;
use thiserror::Error;

/// Errors raised by the collection adapters and the value-cache facade.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A required name, key or collection argument was empty.
    ///
    /// Raised locally, before any store round trip.
    #[error("value cannot be null or empty: {argument}")]
    NullArgument { argument: &'static str },

    /// An indexer read on a dictionary key that is not present.
    #[error("the given key was not present in the dictionary")]
    KeyNotFound,

    /// A dictionary `add` on a key that is already present.
    #[error("an item with the same key has already been added")]
    KeyAlreadyExists,

    /// A list index beyond the bounds of the collection, re-typed from the
    /// server's fixed out-of-range report.
    #[error("index must be within the bounds of the collection")]
    IndexOutOfRange,

    /// The element count exceeds the platform's native integer capacity.
    #[error("count exceeds the maximum value of the native integer")]
    Overflow,

    /// The codec could not encode a value or decode stored text.
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other store error, passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Re-type the server's fixed out-of-range report; pass everything else
/// through unchanged. Applied only at list index-write call sites.
pub(crate) fn translate_index_error(err: StoreError) -> CacheError {
    if err.is_index_out_of_range() {
        CacheError::IndexOutOfRange
    } else {
        CacheError::Store(err)
    }
}

/// Narrow a store-reported count to the native integer width.
pub(crate) fn checked_count(count: u64) -> Result<usize, CacheError> {
    usize::try_from(count).map_err(|_| CacheError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_is_retyped() {
        let err = translate_index_error(StoreError::index_out_of_range());
        assert!(matches!(err, CacheError::IndexOutOfRange));
    }

    #[test]
    fn other_server_errors_pass_through() {
        let err = translate_index_error(StoreError::Server {
            message: "ERR no such key".to_string(),
        });
        match err {
            CacheError::Store(StoreError::Server { message }) => {
                assert_eq!(message, "ERR no such key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn serialization_error_converts() {
        let bad = serde_json::from_str::<i32>("not json").unwrap_err();
        let err: CacheError = bad.into();
        assert!(matches!(err, CacheError::Serialization(_)));
    }
}
