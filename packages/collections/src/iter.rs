//! Index-addressed enumeration over list-backed collections.

use std::marker::PhantomData;

use farcache_store::ListCommands;
use serde::de::DeserializeOwned;

use crate::{codec, CacheError};

/// Direction of traversal over the backing list.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Direction {
    /// Head to tail (lists, queues).
    Forward,
    /// Tail to head (stacks, which push at the tail).
    Reverse,
}

/// A lazy enumerator over a list-backed collection.
///
/// The length is snapshotted once at construction and each element is
/// re-read by index up to that bound; the length is not re-validated
/// mid-iteration. Concurrent shrinkage can therefore surface stale reads,
/// which decode as the element type's zero value. Enumeration is not a
/// consistent point-in-time snapshot.
pub struct IndexIter<'a, T, S> {
    store: &'a S,
    key: &'a str,
    len: usize,
    index: usize,
    direction: Direction,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T, S> IndexIter<'a, T, S> {
    pub(crate) fn new(store: &'a S, key: &'a str, len: usize, direction: Direction) -> Self {
        Self {
            store,
            key,
            len,
            index: 0,
            direction,
            _marker: PhantomData,
        }
    }
}

impl<T, S> Iterator for IndexIter<'_, T, S>
where
    T: DeserializeOwned + Default,
    S: ListCommands,
{
    type Item = Result<T, CacheError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.len {
            return None;
        }
        let position = match self.direction {
            Direction::Forward => self.index,
            Direction::Reverse => self.len - 1 - self.index,
        };
        self.index += 1;

        let item = self
            .store
            .list_index(self.key, position as i64)
            .map_err(CacheError::from)
            .and_then(|text| codec::decode_opt(text.as_deref()));
        if item.is_err() {
            // Stop after surfacing the failure.
            self.index = self.len;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}
