//! List-backed queue adapter (FIFO, head-addressed).

use std::marker::PhantomData;

use farcache_store::{KeyCommands, ListCommands};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::checked_count;
use crate::iter::{Direction, IndexIter};
use crate::key::{collection_key, CollectionKind};
use crate::{codec, CacheError};

/// A shared queue stored at `"Queue:<name>"`.
///
/// The head of the backing list is the front of the queue: `enqueue`
/// appends at the tail, `dequeue` removes from the head.
///
/// # Example
///
/// ```rust
/// use farcache_collections::QueueCache;
/// use farcache_memory::MemoryStore;
/// use std::sync::Arc;
///
/// let queue: QueueCache<String, _> =
///     QueueCache::new(Arc::new(MemoryStore::new()), "jobs").unwrap();
///
/// queue.enqueue(&"first".to_string()).unwrap();
/// queue.enqueue(&"second".to_string()).unwrap();
/// assert_eq!(queue.dequeue().unwrap().as_deref(), Some("first"));
/// ```
#[derive(Debug)]
pub struct QueueCache<T, S> {
    store: S,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T, S> QueueCache<T, S>
where
    T: Serialize + DeserializeOwned + Default,
    S: ListCommands + KeyCommands,
{
    /// Bind an adapter to the queue named `name`. No store call is made.
    pub fn new(store: S, name: &str) -> Result<Self, CacheError> {
        let key = collection_key(CollectionKind::Queue, name)?;
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

    /// Append to the back.
    pub fn enqueue(&self, item: &T) -> Result<(), CacheError> {
        let text = codec::encode(item)?;
        self.store.list_push_tail(&self.key, &text)?;
        Ok(())
    }

    /// Remove and return the front element, or `Ok(None)` when the queue
    /// is empty.
    pub fn dequeue(&self) -> Result<Option<T>, CacheError> {
        match self.store.list_pop_head(&self.key)? {
            Some(text) => Ok(Some(codec::decode(&text)?)),
            None => Ok(None),
        }
    }

    /// Read the front element without removing it, or `Ok(None)` when the
    /// queue is empty.
    pub fn peek(&self) -> Result<Option<T>, CacheError> {
        match self.store.list_range(&self.key, 0, 0)?.into_iter().next() {
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

    /// Whether the queue has no elements.
    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.store.list_len(&self.key)? == 0)
    }

    /// Delete the whole queue.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.store.key_delete(&self.key)?;
        Ok(())
    }

    /// Enumerate front first, from a length snapshot taken here. See
    /// [`IndexIter`] for the consistency caveats.
    pub fn iter(&self) -> Result<IndexIter<'_, T, S>, CacheError> {
        let len = self.len()?;
        Ok(IndexIter::new(&self.store, &self.key, len, Direction::Forward))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farcache_memory::MemoryStore;
    use std::sync::Arc;

    fn queue(name: &str) -> QueueCache<i64, Arc<MemoryStore>> {
        QueueCache::new(Arc::new(MemoryStore::new()), name).unwrap()
    }

    #[test]
    fn enqueue_then_dequeue_round_trips() {
        let q = queue("single");

        q.enqueue(&42).unwrap();
        assert_eq!(q.dequeue().unwrap(), Some(42));
        assert_eq!(q.dequeue().unwrap(), None);
    }

    #[test]
    fn fifo_ordering_across_interleaved_calls() {
        let q = queue("fifo");

        q.enqueue(&1).unwrap();
        q.enqueue(&2).unwrap();
        assert_eq!(q.dequeue().unwrap(), Some(1));

        q.enqueue(&3).unwrap();
        assert_eq!(q.dequeue().unwrap(), Some(2));
        assert_eq!(q.dequeue().unwrap(), Some(3));
        assert_eq!(q.dequeue().unwrap(), None);
    }

    #[test]
    fn peek_reads_the_front_without_removing() {
        let q = queue("peek");
        q.enqueue(&7).unwrap();
        q.enqueue(&8).unwrap();

        assert_eq!(q.peek().unwrap(), Some(7));
        assert_eq!(q.len().unwrap(), 2);
    }

    #[test]
    fn peek_empty_is_none() {
        let q = queue("empty");
        assert_eq!(q.peek().unwrap(), None);
    }

    #[test]
    fn iteration_is_front_first() {
        let q = queue("iter");
        for v in [1, 2, 3] {
            q.enqueue(&v).unwrap();
        }

        let items: Vec<i64> = q.iter().unwrap().collect::<Result<_, _>>().unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn contains_scans_the_snapshot() {
        let q = queue("contains");
        q.enqueue(&5).unwrap();

        assert!(q.contains(&5).unwrap());
        assert!(!q.contains(&6).unwrap());
    }

    #[test]
    fn clear_then_empty() {
        let q = queue("clear");
        q.enqueue(&1).unwrap();

        q.clear().unwrap();
        assert_eq!(q.len().unwrap(), 0);
        assert!(q.is_empty().unwrap());
        assert_eq!(q.iter().unwrap().count(), 0);
    }
}
