//! Key namespace.
//!
//! A collection is identified by (kind, name) and lives under exactly one
//! store key, `"<Kind>:<name>"`. The prefixes are interop constants: any
//! process deriving the same (kind, name) addresses the same collection,
//! and two kinds can never collide on a key.

use crate::CacheError;

/// The collection kinds the adapter layer provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Dictionary,
    List,
    Set,
    Stack,
    Queue,
}

impl CollectionKind {
    /// The literal key prefix for this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            CollectionKind::Dictionary => "Dictionary",
            CollectionKind::List => "List",
            CollectionKind::Set => "Set",
            CollectionKind::Stack => "Stack",
            CollectionKind::Queue => "Queue",
        }
    }
}

/// Derive the store key for a named collection.
///
/// Fails with [`CacheError::NullArgument`] when `name` is empty, before any
/// store call is made.
pub fn collection_key(kind: CollectionKind, name: &str) -> Result<String, CacheError> {
    if name.is_empty() {
        return Err(CacheError::NullArgument { argument: "name" });
    }
    Ok(key_unchecked(kind, name))
}

/// Key derivation for internally generated names, which are never empty.
pub(crate) fn key_unchecked(kind: CollectionKind, name: &str) -> String {
    format!("{}:{}", kind.prefix(), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_the_naming_convention() {
        assert_eq!(
            collection_key(CollectionKind::Dictionary, "users").unwrap(),
            "Dictionary:users"
        );
        assert_eq!(collection_key(CollectionKind::List, "l1").unwrap(), "List:l1");
        assert_eq!(collection_key(CollectionKind::Set, "s1").unwrap(), "Set:s1");
        assert_eq!(
            collection_key(CollectionKind::Stack, "st").unwrap(),
            "Stack:st"
        );
        assert_eq!(
            collection_key(CollectionKind::Queue, "q").unwrap(),
            "Queue:q"
        );
    }

    #[test]
    fn kinds_never_collide() {
        let kinds = [
            CollectionKind::Dictionary,
            CollectionKind::List,
            CollectionKind::Set,
            CollectionKind::Stack,
            CollectionKind::Queue,
        ];
        for a in kinds {
            for b in kinds {
                if a != b {
                    assert_ne!(
                        collection_key(a, "same").unwrap(),
                        collection_key(b, "same").unwrap()
                    );
                }
            }
        }
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = collection_key(CollectionKind::Set, "").unwrap_err();
        assert!(matches!(err, CacheError::NullArgument { argument: "name" }));
    }
}
