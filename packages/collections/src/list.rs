//! List-backed, index-addressed adapter.

use std::marker::PhantomData;

use farcache_store::{KeyCommands, ListCommands};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{checked_count, translate_index_error};
use crate::iter::{Direction, IndexIter};
use crate::key::{collection_key, CollectionKind};
use crate::{codec, CacheError};

/// A shared list stored at `"List:<name>"`.
///
/// Index reads and writes map directly onto the store's list commands.
/// Arbitrary-index deletion has no store equivalent and is emulated with a
/// sentinel choreography; see [`remove_at`](ListCache::remove_at).
///
/// # Example
///
/// ```rust
/// use farcache_collections::ListCache;
/// use farcache_memory::MemoryStore;
/// use std::sync::Arc;
///
/// let list: ListCache<i64, _> =
///     ListCache::new(Arc::new(MemoryStore::new()), "L1").unwrap();
///
/// for v in [10, 20, 30] {
///     list.push(&v).unwrap();
/// }
/// list.remove_at(1).unwrap();
/// assert_eq!(list.len().unwrap(), 2);
/// assert_eq!(list.get(0).unwrap(), Some(10));
/// assert_eq!(list.get(1).unwrap(), Some(30));
/// ```
#[derive(Debug)]
pub struct ListCache<T, S> {
    store: S,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T, S> ListCache<T, S>
where
    T: Serialize + DeserializeOwned + Default,
    S: ListCommands + KeyCommands,
{
    /// Bind an adapter to the list named `name`. No store call is made.
    pub fn new(store: S, name: &str) -> Result<Self, CacheError> {
        let key = collection_key(CollectionKind::List, name)?;
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

    /// Read the element at `index`, or `Ok(None)` when the index is beyond
    /// the bounds (or the list is absent).
    pub fn get(&self, index: usize) -> Result<Option<T>, CacheError> {
        match self.store.list_index(&self.key, index as i64)? {
            Some(text) => Ok(Some(codec::decode(&text)?)),
            None => Ok(None),
        }
    }

    /// Overwrite the element at `index`, failing with
    /// [`CacheError::IndexOutOfRange`] when the index is beyond the bounds.
    pub fn set(&self, index: usize, item: &T) -> Result<(), CacheError> {
        let text = codec::encode(item)?;
        self.store
            .list_set(&self.key, index as i64, &text)
            .map_err(translate_index_error)
    }

    /// Place `item` at `index`.
    ///
    /// This **overwrites** the element at `index`; it does not shift
    /// subsequent elements the way an in-memory list insert would. The
    /// behavior is inherited from the store's set-by-index command and
    /// callers depend on it.
    pub fn insert(&self, index: usize, item: &T) -> Result<(), CacheError> {
        self.set(index, item)
    }

    /// Append to the tail.
    pub fn push(&self, item: &T) -> Result<(), CacheError> {
        let text = codec::encode(item)?;
        self.store.list_push_tail(&self.key, &text)?;
        Ok(())
    }

    /// Remove the element at `index`.
    ///
    /// The store only supports value-based removal, so this is a two-step
    /// emulation: a single-use random sentinel is written at `index`, then
    /// all elements equal to the sentinel are removed. Correctness depends
    /// on the sentinel staying unique within the list for the duration; a
    /// concurrent writer storing an identical value at another index inside
    /// that window would be removed as well. The two steps are not atomic.
    pub fn remove_at(&self, index: usize) -> Result<(), CacheError> {
        let sentinel = Uuid::new_v4().to_string();
        self.store
            .list_set(&self.key, index as i64, &sentinel)
            .map_err(translate_index_error)?;
        self.store.list_remove(&self.key, &sentinel, 0)?;
        Ok(())
    }

    /// Remove the first element equal to `item`. Returns whether one was
    /// found.
    pub fn remove(&self, item: &T) -> Result<bool, CacheError>
    where
        T: PartialEq,
    {
        match self.index_of(item)? {
            Some(index) => {
                self.remove_at(index)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Index of the first element equal to `item`, by linear scan through
    /// this adapter's own enumerator.
    pub fn index_of(&self, item: &T) -> Result<Option<usize>, CacheError>
    where
        T: PartialEq,
    {
        for (index, member) in self.iter()?.enumerate() {
            if member? == *item {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    /// Whether any element equals `item`. Linear scan.
    pub fn contains(&self, item: &T) -> Result<bool, CacheError>
    where
        T: PartialEq,
    {
        Ok(self.index_of(item)?.is_some())
    }

    /// Number of elements, or [`CacheError::Overflow`] when the count
    /// exceeds the native integer.
    pub fn len(&self) -> Result<usize, CacheError> {
        checked_count(self.store.list_len(&self.key)?)
    }

    /// Whether the list has no elements.
    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.store.list_len(&self.key)? == 0)
    }

    /// Delete the whole list.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.store.key_delete(&self.key)?;
        Ok(())
    }

    /// Enumerate head to tail.
    ///
    /// The length is snapshotted here and each element is re-read by index
    /// up to that bound; see [`IndexIter`] for the consistency caveats.
    pub fn iter(&self) -> Result<IndexIter<'_, T, S>, CacheError> {
        let len = self.len()?;
        Ok(IndexIter::new(&self.store, &self.key, len, Direction::Forward))
    }
}
