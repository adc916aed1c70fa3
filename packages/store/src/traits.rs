//! Store command traits.
//!
//! This is the narrow waist of the farcache stack: the minimal command set
//! the collection layer depends on, expressed as plain traits over string
//! keys and serialized string values. No collection semantics live here -
//! a command maps one-to-one onto a store round trip.
//!
//! Commands take `&self`: one client handle is shared by many collections
//! across threads, so implementations own their interior mutability
//! (a connection pool, a mutex, etc.).

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::StoreError;

/// A server-side set combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetCombine {
    Union,
    Intersect,
    Difference,
}

/// Hash (field -> value map) commands.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn HashCommands>`.
pub trait HashCommands: Send + Sync {
    /// Read one field.
    ///
    /// Returns `Ok(None)` when the key or the field does not exist
    /// (not an error condition).
    fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>, StoreError>;

    /// Set one field, creating the hash if absent.
    ///
    /// Returns `true` when the field was newly created, `false` when an
    /// existing field was overwritten.
    fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<bool, StoreError>;

    /// Delete one field. Returns whether the field existed.
    fn hash_delete(&self, key: &str, field: &str) -> Result<bool, StoreError>;

    /// Whether the field exists.
    fn hash_exists(&self, key: &str, field: &str) -> Result<bool, StoreError>;

    /// Number of fields. An absent key counts as zero.
    fn hash_len(&self, key: &str) -> Result<u64, StoreError>;

    /// All field names, materialized in one round trip.
    fn hash_keys(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// All field values, materialized in one round trip.
    fn hash_values(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// One page of a cursor-driven scan over (field, value) entries.
    ///
    /// Start with cursor `0`; the returned cursor feeds the next call, and
    /// a returned cursor of `0` means the scan is complete. Entries added
    /// or removed mid-scan may or may not be observed.
    fn hash_scan(&self, key: &str, cursor: u64)
        -> Result<(u64, Vec<(String, String)>), StoreError>;
}

/// List (index-addressed sequence) commands.
pub trait ListCommands: Send + Sync {
    /// Read the element at `index`. Negative indexes count from the tail.
    ///
    /// Returns `Ok(None)` when the key is absent or the index is out of
    /// bounds for a read.
    fn list_index(&self, key: &str, index: i64) -> Result<Option<String>, StoreError>;

    /// Overwrite the element at `index`.
    ///
    /// The server reports an out-of-bounds index as a [`StoreError::Server`]
    /// carrying [`INDEX_OUT_OF_RANGE_TEXT`](crate::INDEX_OUT_OF_RANGE_TEXT).
    fn list_set(&self, key: &str, index: i64, value: &str) -> Result<(), StoreError>;

    /// Append to the tail, creating the list if absent. Returns the new
    /// length.
    fn list_push_tail(&self, key: &str, value: &str) -> Result<u64, StoreError>;

    /// Remove and return the tail element, or `Ok(None)` when empty.
    fn list_pop_tail(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Remove and return the head element, or `Ok(None)` when empty.
    fn list_pop_head(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Number of elements. An absent key counts as zero.
    fn list_len(&self, key: &str) -> Result<u64, StoreError>;

    /// Remove elements equal to `value`.
    ///
    /// `count > 0` removes up to `count` occurrences from the head,
    /// `count < 0` from the tail, and `count == 0` removes all occurrences.
    /// Returns the number removed.
    fn list_remove(&self, key: &str, value: &str, count: i64) -> Result<u64, StoreError>;

    /// Elements in `[start, stop]` inclusive. Negative indexes count from
    /// the tail; out-of-bounds ranges are clamped, not errors.
    fn list_range(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, StoreError>;
}

/// Set (unique members) commands.
pub trait SetCommands: Send + Sync {
    /// Add one member. Returns whether it was newly added.
    fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    /// Add many members in one round trip. Returns how many were new.
    fn set_add_all(&self, key: &str, members: &[String]) -> Result<u64, StoreError>;

    /// Remove one member. Returns whether it was present.
    fn set_remove(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    /// Whether the member is present.
    fn set_contains(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    /// Number of members. An absent key counts as zero.
    fn set_len(&self, key: &str) -> Result<u64, StoreError>;

    /// One page of a cursor-driven scan over members. Same cursor contract
    /// as [`HashCommands::hash_scan`].
    fn set_scan(&self, key: &str, cursor: u64) -> Result<(u64, Vec<String>), StoreError>;

    /// Compute `first op second` server-side and return the members.
    fn set_combine(
        &self,
        op: SetCombine,
        first: &str,
        second: &str,
    ) -> Result<Vec<String>, StoreError>;

    /// Compute `first op second` server-side and store the result at
    /// `destination`, overwriting it, in one atomic round trip. Returns
    /// the cardinality of the result.
    fn set_combine_store(
        &self,
        op: SetCombine,
        destination: &str,
        first: &str,
        second: &str,
    ) -> Result<u64, StoreError>;
}

/// Generic key commands, independent of the value's collection kind.
pub trait KeyCommands: Send + Sync {
    /// Whether the key exists.
    fn key_exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Delete the key and its value. Returns whether the key existed.
    fn key_delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Expire the key at an absolute wall-clock time. Returns `false` when
    /// the key does not exist.
    fn key_expire_at(&self, key: &str, deadline: SystemTime) -> Result<bool, StoreError>;

    /// Expire the key after a relative duration. Returns `false` when the
    /// key does not exist.
    fn key_expire_in(&self, key: &str, ttl: Duration) -> Result<bool, StoreError>;
}

/// Plain single-value commands, used by the keyed value-cache facade.
pub trait ValueCommands: Send + Sync {
    /// Read the value, or `Ok(None)` when the key is absent.
    fn value_get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write the value unconditionally. Returns whether the write was
    /// accepted.
    fn value_set(&self, key: &str, value: &str) -> Result<bool, StoreError>;

    /// Atomically add `amount` to the integer at `key`, treating an absent
    /// key as zero. Returns the new value.
    fn value_incr_by(&self, key: &str, amount: i64) -> Result<i64, StoreError>;

    /// Atomically subtract `amount` from the integer at `key`, treating an
    /// absent key as zero. Returns the new value.
    fn value_decr_by(&self, key: &str, amount: i64) -> Result<i64, StoreError>;
}

/// The full command surface the collection layer depends on.
///
/// Automatically implemented for any type providing all five command
/// families.
pub trait StoreCommands:
    HashCommands + ListCommands + SetCommands + KeyCommands + ValueCommands
{
}

impl<T: HashCommands + ListCommands + SetCommands + KeyCommands + ValueCommands> StoreCommands
    for T
{
}

// Delegation for shared and boxed handles. A collection adapter holds its
// store by value, so `Arc<C>` is the usual way to fan one client out to
// many adapters.

macro_rules! delegate_commands {
    ($wrapper:ty) => {
        impl<T: HashCommands + ?Sized> HashCommands for $wrapper {
            fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
                (**self).hash_get(key, field)
            }
            fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<bool, StoreError> {
                (**self).hash_set(key, field, value)
            }
            fn hash_delete(&self, key: &str, field: &str) -> Result<bool, StoreError> {
                (**self).hash_delete(key, field)
            }
            fn hash_exists(&self, key: &str, field: &str) -> Result<bool, StoreError> {
                (**self).hash_exists(key, field)
            }
            fn hash_len(&self, key: &str) -> Result<u64, StoreError> {
                (**self).hash_len(key)
            }
            fn hash_keys(&self, key: &str) -> Result<Vec<String>, StoreError> {
                (**self).hash_keys(key)
            }
            fn hash_values(&self, key: &str) -> Result<Vec<String>, StoreError> {
                (**self).hash_values(key)
            }
            fn hash_scan(
                &self,
                key: &str,
                cursor: u64,
            ) -> Result<(u64, Vec<(String, String)>), StoreError> {
                (**self).hash_scan(key, cursor)
            }
        }

        impl<T: ListCommands + ?Sized> ListCommands for $wrapper {
            fn list_index(&self, key: &str, index: i64) -> Result<Option<String>, StoreError> {
                (**self).list_index(key, index)
            }
            fn list_set(&self, key: &str, index: i64, value: &str) -> Result<(), StoreError> {
                (**self).list_set(key, index, value)
            }
            fn list_push_tail(&self, key: &str, value: &str) -> Result<u64, StoreError> {
                (**self).list_push_tail(key, value)
            }
            fn list_pop_tail(&self, key: &str) -> Result<Option<String>, StoreError> {
                (**self).list_pop_tail(key)
            }
            fn list_pop_head(&self, key: &str) -> Result<Option<String>, StoreError> {
                (**self).list_pop_head(key)
            }
            fn list_len(&self, key: &str) -> Result<u64, StoreError> {
                (**self).list_len(key)
            }
            fn list_remove(&self, key: &str, value: &str, count: i64) -> Result<u64, StoreError> {
                (**self).list_remove(key, value, count)
            }
            fn list_range(
                &self,
                key: &str,
                start: i64,
                stop: i64,
            ) -> Result<Vec<String>, StoreError> {
                (**self).list_range(key, start, stop)
            }
        }

        impl<T: SetCommands + ?Sized> SetCommands for $wrapper {
            fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
                (**self).set_add(key, member)
            }
            fn set_add_all(&self, key: &str, members: &[String]) -> Result<u64, StoreError> {
                (**self).set_add_all(key, members)
            }
            fn set_remove(&self, key: &str, member: &str) -> Result<bool, StoreError> {
                (**self).set_remove(key, member)
            }
            fn set_contains(&self, key: &str, member: &str) -> Result<bool, StoreError> {
                (**self).set_contains(key, member)
            }
            fn set_len(&self, key: &str) -> Result<u64, StoreError> {
                (**self).set_len(key)
            }
            fn set_scan(&self, key: &str, cursor: u64) -> Result<(u64, Vec<String>), StoreError> {
                (**self).set_scan(key, cursor)
            }
            fn set_combine(
                &self,
                op: SetCombine,
                first: &str,
                second: &str,
            ) -> Result<Vec<String>, StoreError> {
                (**self).set_combine(op, first, second)
            }
            fn set_combine_store(
                &self,
                op: SetCombine,
                destination: &str,
                first: &str,
                second: &str,
            ) -> Result<u64, StoreError> {
                (**self).set_combine_store(op, destination, first, second)
            }
        }

        impl<T: KeyCommands + ?Sized> KeyCommands for $wrapper {
            fn key_exists(&self, key: &str) -> Result<bool, StoreError> {
                (**self).key_exists(key)
            }
            fn key_delete(&self, key: &str) -> Result<bool, StoreError> {
                (**self).key_delete(key)
            }
            fn key_expire_at(&self, key: &str, deadline: SystemTime) -> Result<bool, StoreError> {
                (**self).key_expire_at(key, deadline)
            }
            fn key_expire_in(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
                (**self).key_expire_in(key, ttl)
            }
        }

        impl<T: ValueCommands + ?Sized> ValueCommands for $wrapper {
            fn value_get(&self, key: &str) -> Result<Option<String>, StoreError> {
                (**self).value_get(key)
            }
            fn value_set(&self, key: &str, value: &str) -> Result<bool, StoreError> {
                (**self).value_set(key, value)
            }
            fn value_incr_by(&self, key: &str, amount: i64) -> Result<i64, StoreError> {
                (**self).value_incr_by(key, amount)
            }
            fn value_decr_by(&self, key: &str, amount: i64) -> Result<i64, StoreError> {
                (**self).value_decr_by(key, amount)
            }
        }
    };
}

delegate_commands!(Arc<T>);
delegate_commands!(Box<T>);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// A store that only speaks the value commands, for checking the
    /// delegation impls compile and forward.
    struct ValueOnly {
        data: Mutex<HashMap<String, String>>,
    }

    impl ValueCommands for ValueOnly {
        fn value_get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.data.lock().unwrap().get(key).cloned())
        }
        fn value_set(&self, key: &str, value: &str) -> Result<bool, StoreError> {
            self.data
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(true)
        }
        fn value_incr_by(&self, key: &str, amount: i64) -> Result<i64, StoreError> {
            let mut data = self.data.lock().unwrap();
            let current: i64 = data.get(key).map(|v| v.parse().unwrap()).unwrap_or(0);
            let next = current + amount;
            data.insert(key.to_string(), next.to_string());
            Ok(next)
        }
        fn value_decr_by(&self, key: &str, amount: i64) -> Result<i64, StoreError> {
            self.value_incr_by(key, -amount)
        }
    }

    #[test]
    fn arc_delegation_forwards() {
        let store = Arc::new(ValueOnly {
            data: Mutex::new(HashMap::new()),
        });

        store.value_set("k", "v").unwrap();
        assert_eq!(store.value_get("k").unwrap().as_deref(), Some("v"));

        // Two handles over the same state.
        let other = Arc::clone(&store);
        assert_eq!(other.value_get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn boxed_dyn_delegation_forwards() {
        let store: Box<dyn ValueCommands> = Box::new(ValueOnly {
            data: Mutex::new(HashMap::new()),
        });

        assert_eq!(store.value_incr_by("n", 3).unwrap(), 3);
        assert_eq!(store.value_incr_by("n", 4).unwrap(), 7);
        assert_eq!(store.value_decr_by("n", 2).unwrap(), 5);
    }
}
