//! List-backed stack adapter (LIFO, tail-addressed).

use std::marker::PhantomData;

use farcache_store::{KeyCommands, ListCommands};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::checked_count;
use crate::iter::{Direction, IndexIter};
use crate::key::{collection_key, CollectionKind};
use crate::{codec, CacheError};

/// A shared stack stored at `"Stack:<name>"`.
///
/// The tail of the backing list is the top of the stack: `push` appends at
/// the tail, `pop` removes from the tail.
///
/// # Example
///
/// ```rust
/// use farcache_collections::StackCache;
/// use farcache_memory::MemoryStore;
/// use std::sync::Arc;
///
/// let stack: StackCache<String, _> =
///     StackCache::new(Arc::new(MemoryStore::new()), "work").unwrap();
///
/// stack.push(&"first".to_string()).unwrap();
/// stack.push(&"second".to_string()).unwrap();
/// assert_eq!(stack.pop().unwrap().as_deref(), Some("second"));
/// ```
#[derive(Debug)]
pub struct StackCache<T, S> {
    store: S,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T, S> StackCache<T, S>
where
    T: Serialize + DeserializeOwned + Default,
    S: ListCommands + KeyCommands,
{
    /// Bind an adapter to the stack named `name`. No store call is made.
    pub fn new(store: S, name: &str) -> Result<Self, CacheError> {
        let key = collection_key(CollectionKind::Stack, name)?;
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

    /// Push onto the top.
    pub fn push(&self, item: &T) -> Result<(), CacheError> {
        let text = codec::encode(item)?;
        self.store.list_push_tail(&self.key, &text)?;
        Ok(())
    }

    /// Remove and return the top element, or `Ok(None)` when the stack is
    /// empty.
    pub fn pop(&self) -> Result<Option<T>, CacheError> {
        match self.store.list_pop_tail(&self.key)? {
            Some(text) => Ok(Some(codec::decode(&text)?)),
            None => Ok(None),
        }
    }

    /// Read the top element without removing it, or `Ok(None)` when the
    /// stack is empty.
    pub fn peek(&self) -> Result<Option<T>, CacheError> {
        match self.store.list_range(&self.key, -1, -1)?.into_iter().next() {
            Some(text) => Ok(Some(codec::decode(&text)?)),
            None => Ok(None),
        }
    }

    /// Whether any element equals `item`. Linear scan with the same
    /// snapshot caveats as list enumeration.
    pub fn contains(&self, item: &T) -> Result<bool, CacheError>
    where
        T: PartialEq,
    {
        for member in self.iter()? {
            if member? == *item {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Number of elements, or [`CacheError::Overflow`] when the count
    /// exceeds the native integer.
    pub fn len(&self) -> Result<usize, CacheError> {
        checked_count(self.store.list_len(&self.key)?)
    }

    /// Whether the stack has no elements.
    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.store.list_len(&self.key)? == 0)
    }

    /// Delete the whole stack.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.store.key_delete(&self.key)?;
        Ok(())
    }

    /// Enumerate top first, from a length snapshot taken here. See
    /// [`IndexIter`] for the consistency caveats.
    pub fn iter(&self) -> Result<IndexIter<'_, T, S>, CacheError> {
        let len = self.len()?;
        Ok(IndexIter::new(&self.store, &self.key, len, Direction::Reverse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farcache_memory::MemoryStore;
    use std::sync::Arc;

    fn stack(name: &str) -> StackCache<i64, Arc<MemoryStore>> {
        StackCache::new(Arc::new(MemoryStore::new()), name).unwrap()
    }

    #[test]
    fn push_then_pop_round_trips() {
        let s = stack("lifo");

        s.push(&42).unwrap();
        assert_eq!(s.pop().unwrap(), Some(42));
        assert_eq!(s.pop().unwrap(), None);
    }

    #[test]
    fn pop_is_lifo() {
        let s = stack("order");
        for v in [1, 2, 3] {
            s.push(&v).unwrap();
        }

        assert_eq!(s.pop().unwrap(), Some(3));
        assert_eq!(s.pop().unwrap(), Some(2));
        assert_eq!(s.pop().unwrap(), Some(1));
    }

    #[test]
    fn peek_does_not_remove() {
        let s = stack("peek");
        s.push(&7).unwrap();

        assert_eq!(s.peek().unwrap(), Some(7));
        assert_eq!(s.len().unwrap(), 1);
        assert_eq!(s.peek().unwrap(), Some(7));
    }

    #[test]
    fn peek_empty_is_none() {
        let s = stack("empty");
        assert_eq!(s.peek().unwrap(), None);
    }

    #[test]
    fn iteration_is_top_first() {
        let s = stack("iter");
        for v in [1, 2, 3] {
            s.push(&v).unwrap();
        }

        let items: Vec<i64> = s.iter().unwrap().collect::<Result<_, _>>().unwrap();
        assert_eq!(items, vec![3, 2, 1]);
    }

    #[test]
    fn contains_scans_the_snapshot() {
        let s = stack("contains");
        for v in [5, 6] {
            s.push(&v).unwrap();
        }

        assert!(s.contains(&5).unwrap());
        assert!(!s.contains(&9).unwrap());
    }

    #[test]
    fn clear_then_empty() {
        let s = stack("clear");
        s.push(&1).unwrap();

        s.clear().unwrap();
        assert_eq!(s.len().unwrap(), 0);
        assert!(s.is_empty().unwrap());
        assert_eq!(s.iter().unwrap().count(), 0);
    }
}
