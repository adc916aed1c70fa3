//! Hash-backed dictionary adapter.

use std::collections::VecDeque;
use std::marker::PhantomData;

use farcache_store::{HashCommands, KeyCommands};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::checked_count;
use crate::key::{collection_key, CollectionKind};
use crate::{codec, CacheError};

/// A shared dictionary stored as a hash at `"Dictionary:<name>"`.
///
/// Every operation is a store round trip; two instances constructed with
/// the same name (in the same or different processes) observe the same
/// entries. Single-field commands are atomic at the store.
///
/// # Example
///
/// ```rust
/// use farcache_collections::DictionaryCache;
/// use farcache_memory::MemoryStore;
/// use std::sync::Arc;
///
/// let store = Arc::new(MemoryStore::new());
/// let dict: DictionaryCache<String, i64, _> =
///     DictionaryCache::new(Arc::clone(&store), "scores").unwrap();
///
/// dict.set(&"alice".to_string(), &10).unwrap();
/// assert_eq!(dict.get(&"alice".to_string()).unwrap(), 10);
/// ```
#[derive(Debug)]
pub struct DictionaryCache<K, V, S> {
    store: S,
    key: String,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V, S> DictionaryCache<K, V, S>
where
    K: Serialize + DeserializeOwned + Default,
    V: Serialize + DeserializeOwned + Default,
    S: HashCommands + KeyCommands,
{
    /// Bind an adapter to the dictionary named `name`.
    ///
    /// The collection is created implicitly on first write; constructing an
    /// adapter performs no store call.
    pub fn new(store: S, name: &str) -> Result<Self, CacheError> {
        let key = collection_key(CollectionKind::Dictionary, name)?;
        Ok(Self {
            store,
            key,
            _marker: PhantomData,
        })
    }

    /// The store key this adapter addresses.
    pub fn store_key(&self) -> &str {
        &self.key
    }

    /// Whether an entry exists for `key`.
    pub fn contains_key(&self, key: &K) -> Result<bool, CacheError> {
        let field = codec::encode(key)?;
        Ok(self.store.hash_exists(&self.key, &field)?)
    }

    /// Read the value for `key`, failing with [`CacheError::KeyNotFound`]
    /// when it is absent.
    pub fn get(&self, key: &K) -> Result<V, CacheError> {
        self.try_get(key)?.ok_or(CacheError::KeyNotFound)
    }

    /// Read the value for `key`, or `Ok(None)` when it is absent.
    pub fn try_get(&self, key: &K) -> Result<Option<V>, CacheError> {
        let field = codec::encode(key)?;
        match self.store.hash_get(&self.key, &field)? {
            // An empty stored value reads the same as a missing entry.
            Some(text) if !text.trim().is_empty() => Ok(Some(codec::decode(&text)?)),
            _ => Ok(None),
        }
    }

    /// Upsert the value for `key`. Never fails on an existing entry;
    /// returns whether the entry was newly created.
    pub fn set(&self, key: &K, value: &V) -> Result<bool, CacheError> {
        let field = codec::encode(key)?;
        let text = codec::encode(value)?;
        Ok(self.store.hash_set(&self.key, &field, &text)?)
    }

    /// Add a new entry, failing with [`CacheError::KeyAlreadyExists`] when
    /// the key is present.
    ///
    /// This is check-then-set: a concurrent writer can slip between the
    /// existence check and the write, in which case its value is
    /// overwritten. Callers needing a hard uniqueness guarantee must
    /// serialize their writers externally.
    pub fn add(&self, key: &K, value: &V) -> Result<(), CacheError> {
        if self.contains_key(key)? {
            return Err(CacheError::KeyAlreadyExists);
        }
        self.set(key, value)?;
        Ok(())
    }

    /// Upsert without the duplicate check; returns whether the entry was
    /// newly created.
    pub fn try_add(&self, key: &K, value: &V) -> Result<bool, CacheError> {
        self.set(key, value)
    }

    /// Remove the entry for `key`. Returns whether it existed.
    pub fn remove(&self, key: &K) -> Result<bool, CacheError> {
        let field = codec::encode(key)?;
        Ok(self.store.hash_delete(&self.key, &field)?)
    }

    /// Number of entries, or [`CacheError::Overflow`] when the count
    /// exceeds the native integer.
    pub fn len(&self) -> Result<usize, CacheError> {
        checked_count(self.store.hash_len(&self.key)?)
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.store.hash_len(&self.key)? == 0)
    }

    /// All keys, materialized in one round trip.
    pub fn keys(&self) -> Result<Vec<K>, CacheError> {
        self.store
            .hash_keys(&self.key)?
            .iter()
            .map(|text| codec::decode(text))
            .collect()
    }

    /// All values, materialized in one round trip.
    pub fn values(&self) -> Result<Vec<V>, CacheError> {
        self.store
            .hash_values(&self.key)?
            .iter()
            .map(|text| codec::decode(text))
            .collect()
    }

    /// Delete the whole dictionary.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.store.key_delete(&self.key)?;
        Ok(())
    }

    /// Lazily enumerate (key, value) pairs via the store's hash scan.
    ///
    /// There is no snapshot guarantee: entries added or removed during the
    /// scan may or may not be observed.
    pub fn iter(&self) -> DictionaryIter<'_, K, V, S> {
        DictionaryIter {
            store: &self.store,
            key: &self.key,
            cursor: 0,
            buffer: VecDeque::new(),
            done: false,
            _marker: PhantomData,
        }
    }
}

/// Lazy (key, value) enumeration over a [`DictionaryCache`].
pub struct DictionaryIter<'a, K, V, S> {
    store: &'a S,
    key: &'a str,
    cursor: u64,
    buffer: VecDeque<(String, String)>,
    done: bool,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V, S> Iterator for DictionaryIter<'_, K, V, S>
where
    K: DeserializeOwned + Default,
    V: DeserializeOwned + Default,
    S: HashCommands,
{
    type Item = Result<(K, V), CacheError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((field, text)) = self.buffer.pop_front() {
                let pair = codec::decode(&field).and_then(|k| Ok((k, codec::decode(&text)?)));
                return Some(pair);
            }
            if self.done {
                return None;
            }
            match self.store.hash_scan(self.key, self.cursor) {
                Ok((next, page)) => {
                    self.cursor = next;
                    self.done = next == 0;
                    self.buffer.extend(page);
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farcache_memory::MemoryStore;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn dict(name: &str) -> DictionaryCache<String, i64, Arc<MemoryStore>> {
        DictionaryCache::new(Arc::new(MemoryStore::new()), name).unwrap()
    }

    #[test]
    fn empty_name_is_rejected_before_any_store_call() {
        let err =
            DictionaryCache::<String, i64, _>::new(Arc::new(MemoryStore::new()), "").unwrap_err();
        assert!(matches!(err, CacheError::NullArgument { .. }));
    }

    #[test]
    fn add_fails_on_duplicate_key() {
        let d = dict("D1");

        d.add(&"a".to_string(), &1).unwrap();
        let err = d.add(&"a".to_string(), &2).unwrap_err();
        assert!(matches!(err, CacheError::KeyAlreadyExists));

        assert_eq!(d.get(&"a".to_string()).unwrap(), 1);
        assert!(d.remove(&"a".to_string()).unwrap());
        assert!(!d.contains_key(&"a".to_string()).unwrap());
    }

    #[test]
    fn set_never_fails_on_existing_key() {
        let d = dict("upsert");

        assert!(d.set(&"k".to_string(), &1).unwrap());
        assert!(!d.set(&"k".to_string(), &2).unwrap());
        assert_eq!(d.get(&"k".to_string()).unwrap(), 2);
    }

    #[test]
    fn try_add_reports_newness_without_failing() {
        let d = dict("tryadd");

        assert!(d.try_add(&"k".to_string(), &1).unwrap());
        assert!(!d.try_add(&"k".to_string(), &2).unwrap());
        assert_eq!(d.get(&"k".to_string()).unwrap(), 2);
    }

    #[test]
    fn get_absent_key_is_key_not_found() {
        let d = dict("absent");
        assert!(matches!(
            d.get(&"missing".to_string()).unwrap_err(),
            CacheError::KeyNotFound
        ));
        assert_eq!(d.try_get(&"missing".to_string()).unwrap(), None);
    }

    #[test]
    fn two_adapters_share_one_collection() {
        let store = Arc::new(MemoryStore::new());
        let a: DictionaryCache<String, i64, _> =
            DictionaryCache::new(Arc::clone(&store), "shared").unwrap();
        let b: DictionaryCache<String, i64, _> =
            DictionaryCache::new(Arc::clone(&store), "shared").unwrap();

        a.set(&"k".to_string(), &7).unwrap();
        assert_eq!(b.get(&"k".to_string()).unwrap(), 7);
    }

    #[test]
    fn clear_empties_the_dictionary() {
        let d = dict("clear");
        d.set(&"a".to_string(), &1).unwrap();
        d.set(&"b".to_string(), &2).unwrap();

        d.clear().unwrap();
        assert_eq!(d.len().unwrap(), 0);
        assert!(d.is_empty().unwrap());
        assert_eq!(d.iter().count(), 0);
    }

    #[test]
    fn keys_values_and_iteration_agree() {
        let d = dict("enum");
        for (k, v) in [("a", 1), ("b", 2), ("c", 3)] {
            d.set(&k.to_string(), &v).unwrap();
        }

        let mut keys = d.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a", "b", "c"]);

        let mut values = d.values().unwrap();
        values.sort();
        assert_eq!(values, vec![1, 2, 3]);

        let scanned: HashMap<String, i64> = d.iter().collect::<Result<_, _>>().unwrap();
        assert_eq!(scanned.len(), 3);
        assert_eq!(scanned["b"], 2);
    }

    #[test]
    fn iteration_is_restartable() {
        let d = dict("restart");
        d.set(&"k".to_string(), &1).unwrap();

        assert_eq!(d.iter().count(), 1);
        assert_eq!(d.iter().count(), 1);
    }
}
