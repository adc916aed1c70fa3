//! Plain keyed value cache.
//!
//! A one-to-one passthrough to the store's value and key commands, with no
//! emulation: every method is at most two round trips (a write plus an
//! expiry, or a check plus a write).

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use farcache_store::{KeyCommands, ValueCommands};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{codec, CacheError};

fn require_key(key: &str) -> Result<(), CacheError> {
    if key.is_empty() {
        return Err(CacheError::NullArgument { argument: "key" });
    }
    Ok(())
}

/// A typed cache over plain store keys.
///
/// Unlike the collection adapters, keys are used verbatim - there is no
/// kind prefix. Values round-trip through the JSON codec; a missing or
/// empty stored value reads as the type's zero value.
///
/// # Example
///
/// ```rust
/// use farcache_collections::ValueCache;
/// use farcache_memory::MemoryStore;
/// use std::sync::Arc;
///
/// let cache = ValueCache::new(Arc::new(MemoryStore::new()));
///
/// cache.set("visits", &3_i64).unwrap();
/// assert_eq!(cache.get::<i64>("visits").unwrap(), 3);
/// assert_eq!(cache.increment("visits", 1).unwrap(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct ValueCache<S> {
    store: S,
}

impl<S: ValueCommands + KeyCommands> ValueCache<S> {
    /// Build a cache over a store client.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Whether the key exists.
    pub fn contains_key(&self, key: &str) -> Result<bool, CacheError> {
        require_key(key)?;
        Ok(self.store.key_exists(key)?)
    }

    /// Read the value at `key`. A missing or empty value reads as the
    /// type's zero value.
    pub fn get<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, CacheError> {
        require_key(key)?;
        let text = self.store.value_get(key)?;
        codec::decode_opt(text.as_deref())
    }

    /// Read many keys, one round trip each.
    pub fn get_all<T: DeserializeOwned + Default>(
        &self,
        keys: &[&str],
    ) -> Result<HashMap<String, T>, CacheError> {
        let mut values = HashMap::with_capacity(keys.len());
        for key in keys {
            values.insert((*key).to_string(), self.get(key)?);
        }
        Ok(values)
    }

    /// Write `value` at `key` regardless of whether it already exists.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<bool, CacheError> {
        require_key(key)?;
        let text = codec::encode(value)?;
        Ok(self.store.value_set(key, &text)?)
    }

    /// [`set`](Self::set), then expire the key at an absolute time.
    pub fn set_expires_at<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expires_at: SystemTime,
    ) -> Result<bool, CacheError> {
        if !self.set(key, value)? {
            return Ok(false);
        }
        Ok(self.store.key_expire_at(key, expires_at)?)
    }

    /// [`set`](Self::set), then expire the key after a duration.
    pub fn set_expires_in<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expires_in: Duration,
    ) -> Result<bool, CacheError> {
        if !self.set(key, value)? {
            return Ok(false);
        }
        Ok(self.store.key_expire_in(key, expires_in)?)
    }

    /// Write every entry, one round trip each.
    pub fn set_all<T: Serialize>(&self, values: &HashMap<String, T>) -> Result<(), CacheError> {
        for (key, value) in values {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Write `value` only when `key` is absent. Reports success without
    /// writing when the key already exists.
    ///
    /// Check-then-set; a concurrent writer can slip between the check and
    /// the write.
    pub fn add<T: Serialize>(&self, key: &str, value: &T) -> Result<bool, CacheError> {
        if self.contains_key(key)? {
            return Ok(true);
        }
        self.set(key, value)
    }

    /// [`add`](Self::add) with an absolute expiry on a fresh write.
    pub fn add_expires_at<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expires_at: SystemTime,
    ) -> Result<bool, CacheError> {
        if self.contains_key(key)? {
            return Ok(true);
        }
        self.set_expires_at(key, value, expires_at)
    }

    /// [`add`](Self::add) with a relative expiry on a fresh write.
    pub fn add_expires_in<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expires_in: Duration,
    ) -> Result<bool, CacheError> {
        if self.contains_key(key)? {
            return Ok(true);
        }
        self.set_expires_in(key, value, expires_in)
    }

    /// Delete `key`. Returns whether it existed.
    pub fn remove(&self, key: &str) -> Result<bool, CacheError> {
        require_key(key)?;
        Ok(self.store.key_delete(key)?)
    }

    /// Delete many keys, one round trip each.
    pub fn remove_all(&self, keys: &[&str]) -> Result<(), CacheError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }

    /// Write `value` only when `key` already exists. Reports success
    /// without writing when the key is absent.
    pub fn replace<T: Serialize>(&self, key: &str, value: &T) -> Result<bool, CacheError> {
        if !self.contains_key(key)? {
            return Ok(true);
        }
        self.set(key, value)
    }

    /// [`replace`](Self::replace) with an absolute expiry on a fresh write.
    pub fn replace_expires_at<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expires_at: SystemTime,
    ) -> Result<bool, CacheError> {
        if !self.contains_key(key)? {
            return Ok(true);
        }
        self.set_expires_at(key, value, expires_at)
    }

    /// [`replace`](Self::replace) with a relative expiry on a fresh write.
    pub fn replace_expires_in<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expires_in: Duration,
    ) -> Result<bool, CacheError> {
        if !self.contains_key(key)? {
            return Ok(true);
        }
        self.set_expires_in(key, value, expires_in)
    }

    /// Atomically add `amount` to the integer at `key`, server-side. An
    /// absent key counts from zero. Returns the new value.
    pub fn increment(&self, key: &str, amount: i64) -> Result<i64, CacheError> {
        require_key(key)?;
        Ok(self.store.value_incr_by(key, amount)?)
    }

    /// Atomically subtract `amount` from the integer at `key`, server-side.
    /// Returns the new value.
    pub fn decrement(&self, key: &str, amount: i64) -> Result<i64, CacheError> {
        require_key(key)?;
        Ok(self.store.value_decr_by(key, amount)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farcache_memory::MemoryStore;
    use std::sync::Arc;

    fn cache() -> ValueCache<Arc<MemoryStore>> {
        ValueCache::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn get_missing_key_reads_as_zero_value() {
        let c = cache();
        assert_eq!(c.get::<i64>("missing").unwrap(), 0);
        assert_eq!(c.get::<String>("missing").unwrap(), "");
    }

    #[test]
    fn set_then_get_round_trips() {
        let c = cache();
        c.set("name", &"alice".to_string()).unwrap();
        assert_eq!(c.get::<String>("name").unwrap(), "alice");
        assert!(c.contains_key("name").unwrap());
    }

    #[test]
    fn add_is_noop_success_on_existing_key() {
        let c = cache();
        c.set("k", &1_i64).unwrap();

        assert!(c.add("k", &2_i64).unwrap());
        assert_eq!(c.get::<i64>("k").unwrap(), 1);

        assert!(c.add("fresh", &3_i64).unwrap());
        assert_eq!(c.get::<i64>("fresh").unwrap(), 3);
    }

    #[test]
    fn replace_is_noop_success_on_absent_key() {
        let c = cache();

        assert!(c.replace("missing", &1_i64).unwrap());
        assert!(!c.contains_key("missing").unwrap());

        c.set("k", &1_i64).unwrap();
        assert!(c.replace("k", &2_i64).unwrap());
        assert_eq!(c.get::<i64>("k").unwrap(), 2);
    }

    #[test]
    fn increment_and_decrement_are_cumulative() {
        let c = cache();

        assert_eq!(c.increment("hits", 5).unwrap(), 5);
        assert_eq!(c.increment("hits", 2).unwrap(), 7);
        assert_eq!(c.decrement("hits", 3).unwrap(), 4);
    }

    #[test]
    fn bulk_operations_cover_every_key() {
        let c = cache();
        let mut values = HashMap::new();
        values.insert("a".to_string(), 1_i64);
        values.insert("b".to_string(), 2_i64);
        c.set_all(&values).unwrap();

        let all = c.get_all::<i64>(&["a", "b"]).unwrap();
        assert_eq!(all["a"], 1);
        assert_eq!(all["b"], 2);

        c.remove_all(&["a", "b"]).unwrap();
        assert!(!c.contains_key("a").unwrap());
        assert!(!c.contains_key("b").unwrap());
    }

    #[test]
    fn expiry_variants_expire_the_key() {
        let c = cache();

        c.set_expires_at("gone", &1_i64, SystemTime::now() - Duration::from_secs(1))
            .unwrap();
        assert!(!c.contains_key("gone").unwrap());

        c.set_expires_in("kept", &1_i64, Duration::from_secs(60)).unwrap();
        assert!(c.contains_key("kept").unwrap());
    }

    #[test]
    fn empty_key_is_rejected_locally() {
        let c = cache();
        assert!(matches!(
            c.get::<i64>("").unwrap_err(),
            CacheError::NullArgument { argument: "key" }
        ));
        assert!(matches!(
            c.set("", &1_i64).unwrap_err(),
            CacheError::NullArgument { .. }
        ));
    }
}
