//! Set-backed adapter with server-side set algebra.

use std::collections::HashSet;
use std::collections::VecDeque;
use std::marker::PhantomData;

use farcache_store::{KeyCommands, SetCombine, SetCommands};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::checked_count;
use crate::key::{collection_key, key_unchecked, CollectionKind};
use crate::{codec, CacheError};

/// A shared set stored at `"Set:<name>"`.
///
/// Membership commands map one-to-one onto store set commands. The
/// relational tests and mutating algebra come in two flavors: against
/// another [`SetCache`] they run server-side through the combine commands
/// without transferring contents, and against an arbitrary local sequence
/// (`*_items` methods) they are computed locally or through a temporary
/// set.
///
/// Member equality is equality of the encoded wire text - the same equality
/// the store itself applies.
///
/// # Example
///
/// ```rust
/// use farcache_collections::SetCache;
/// use farcache_memory::MemoryStore;
/// use std::sync::Arc;
///
/// let store = Arc::new(MemoryStore::new());
/// let s1: SetCache<i64, _> = SetCache::new(Arc::clone(&store), "S1").unwrap();
/// let s2: SetCache<i64, _> = SetCache::new(Arc::clone(&store), "S2").unwrap();
///
/// s1.add_all(&[1, 2, 3]).unwrap();
/// s2.add_all(&[2, 3, 4]).unwrap();
///
/// s1.symmetric_except_with(&s2).unwrap();
/// assert!(s1.contains(&1).unwrap());
/// assert!(s1.contains(&4).unwrap());
/// assert_eq!(s1.len().unwrap(), 2);
/// ```
#[derive(Debug)]
pub struct SetCache<T, S> {
    store: S,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

/// An ephemeral set under a collision-resistant random name, used as
/// scratch space during multi-step algebra. Never exposed to callers;
/// deleted on every exit path when the guard drops. Cleanup failures are
/// logged and otherwise ignored - the scratch key expires from relevance
/// the moment the owning operation returns.
struct TempSet<'a, S: KeyCommands> {
    store: &'a S,
    key: String,
}

impl<'a, S: KeyCommands> TempSet<'a, S> {
    fn create(store: &'a S) -> Self {
        let key = key_unchecked(CollectionKind::Set, &Uuid::new_v4().to_string());
        Self { store, key }
    }

    fn key(&self) -> &str {
        &self.key
    }
}

impl<S: KeyCommands> Drop for TempSet<'_, S> {
    fn drop(&mut self) {
        if let Err(err) = self.store.key_delete(&self.key) {
            tracing::warn!(key = %self.key, error = %err, "failed to delete temporary set");
        }
    }
}

impl<T, S> SetCache<T, S>
where
    T: Serialize + DeserializeOwned + Default,
    S: SetCommands + KeyCommands,
{
    /// Bind an adapter to the set named `name`. No store call is made.
    pub fn new(store: S, name: &str) -> Result<Self, CacheError> {
        let key = collection_key(CollectionKind::Set, name)?;
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

    /// Add one member. Returns whether it was newly added.
    pub fn add(&self, item: &T) -> Result<bool, CacheError> {
        let member = codec::encode(item)?;
        Ok(self.store.set_add(&self.key, &member)?)
    }

    /// Add many members in one round trip. Returns how many were new.
    pub fn add_all(&self, items: &[T]) -> Result<u64, CacheError> {
        if items.is_empty() {
            return Ok(0);
        }
        let members = encode_all(items.iter())?;
        Ok(self.store.set_add_all(&self.key, &members)?)
    }

    /// Remove one member. Returns whether it was present.
    pub fn remove(&self, item: &T) -> Result<bool, CacheError> {
        let member = codec::encode(item)?;
        Ok(self.store.set_remove(&self.key, &member)?)
    }

    /// Whether `item` is a member.
    pub fn contains(&self, item: &T) -> Result<bool, CacheError> {
        let member = codec::encode(item)?;
        Ok(self.store.set_contains(&self.key, &member)?)
    }

    /// Number of members, or [`CacheError::Overflow`] when the count
    /// exceeds the native integer.
    pub fn len(&self) -> Result<usize, CacheError> {
        checked_count(self.store.set_len(&self.key)?)
    }

    /// Whether the set has no members.
    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.store.set_len(&self.key)? == 0)
    }

    /// Delete the whole set.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.store.key_delete(&self.key)?;
        Ok(())
    }

    /// Lazily enumerate members via the store's set scan. No snapshot
    /// guarantee against concurrent mutation.
    pub fn iter(&self) -> SetIter<'_, T, S> {
        SetIter {
            store: &self.store,
            key: &self.key,
            cursor: 0,
            buffer: VecDeque::new(),
            done: false,
            _marker: PhantomData,
        }
    }

    // ---- mutating algebra against another adapter -------------------

    /// Remove every member of `other` from self. One server-side
    /// combine-and-store; all-or-nothing at the store.
    pub fn except_with(&self, other: &SetCache<T, S>) -> Result<(), CacheError> {
        self.combine_into_self(SetCombine::Difference, &other.key)
    }

    /// Keep only members also in `other`. One server-side
    /// combine-and-store.
    pub fn intersect_with(&self, other: &SetCache<T, S>) -> Result<(), CacheError> {
        self.combine_into_self(SetCombine::Intersect, &other.key)
    }

    /// Add every member of `other` to self. One server-side
    /// combine-and-store.
    pub fn union_with(&self, other: &SetCache<T, S>) -> Result<(), CacheError> {
        self.combine_into_self(SetCombine::Union, &other.key)
    }

    /// Make self the symmetric difference of self and `other`, leaving
    /// `other` untouched.
    ///
    /// The store has no single command for this, so it is synthesized in
    /// three combine-and-store steps through a temporary set:
    ///
    /// 1. intersection(self, other) into the temporary set - computed
    ///    before self changes, because step 2 destroys the information
    ///    needed for it;
    /// 2. union(self, other) stored back into self;
    /// 3. the temporary intersection subtracted from self in place.
    ///
    /// Each step is atomic at the store but the sequence is not: a failure
    /// after step 2 leaves self holding the union. The temporary set is
    /// deleted on every exit path. Not crash-atomic, by contract.
    pub fn symmetric_except_with(&self, other: &SetCache<T, S>) -> Result<(), CacheError> {
        let intersected = TempSet::create(&self.store);
        self.store.set_combine_store(
            SetCombine::Intersect,
            intersected.key(),
            &self.key,
            &other.key,
        )?;
        self.store
            .set_combine_store(SetCombine::Union, &self.key, &self.key, &other.key)?;
        self.store.set_combine_store(
            SetCombine::Difference,
            &self.key,
            &self.key,
            intersected.key(),
        )?;
        Ok(())
    }

    // ---- mutating algebra against a local sequence ------------------

    /// [`except_with`](Self::except_with) against a local sequence,
    /// materialized into a temporary set first.
    pub fn except_with_items(&self, items: &[T]) -> Result<(), CacheError> {
        self.combine_with_items(SetCombine::Difference, items)
    }

    /// [`intersect_with`](Self::intersect_with) against a local sequence.
    pub fn intersect_with_items(&self, items: &[T]) -> Result<(), CacheError> {
        self.combine_with_items(SetCombine::Intersect, items)
    }

    /// [`union_with`](Self::union_with) against a local sequence.
    pub fn union_with_items(&self, items: &[T]) -> Result<(), CacheError> {
        self.combine_with_items(SetCombine::Union, items)
    }

    /// [`symmetric_except_with`](Self::symmetric_except_with) against a
    /// local sequence, materialized into a temporary set first.
    pub fn symmetric_except_with_items(&self, items: &[T]) -> Result<(), CacheError> {
        let other = self.materialize(items)?;
        let intersected = TempSet::create(&self.store);
        self.store.set_combine_store(
            SetCombine::Intersect,
            intersected.key(),
            &self.key,
            other.key(),
        )?;
        self.store
            .set_combine_store(SetCombine::Union, &self.key, &self.key, other.key())?;
        self.store.set_combine_store(
            SetCombine::Difference,
            &self.key,
            &self.key,
            intersected.key(),
        )?;
        Ok(())
    }

    // ---- relational tests against another adapter -------------------

    /// Whether every member of self is in `other`. Server-side difference,
    /// nothing transferred beyond the result.
    pub fn is_subset_of(&self, other: &SetCache<T, S>) -> Result<bool, CacheError> {
        Ok(self
            .store
            .set_combine(SetCombine::Difference, &self.key, &other.key)?
            .is_empty())
    }

    /// Whether every member of `other` is in self.
    pub fn is_superset_of(&self, other: &SetCache<T, S>) -> Result<bool, CacheError> {
        Ok(self
            .store
            .set_combine(SetCombine::Difference, &other.key, &self.key)?
            .is_empty())
    }

    /// Subset, and strictly smaller.
    pub fn is_proper_subset_of(&self, other: &SetCache<T, S>) -> Result<bool, CacheError> {
        Ok(self.len()? < other.len()? && self.is_subset_of(other)?)
    }

    /// Superset, and strictly larger.
    pub fn is_proper_superset_of(&self, other: &SetCache<T, S>) -> Result<bool, CacheError> {
        Ok(self.len()? > other.len()? && self.is_superset_of(other)?)
    }

    /// Whether self and `other` share at least one member.
    pub fn overlaps(&self, other: &SetCache<T, S>) -> Result<bool, CacheError> {
        Ok(!self
            .store
            .set_combine(SetCombine::Intersect, &self.key, &other.key)?
            .is_empty())
    }

    /// Whether self and `other` hold exactly the same members: a subset
    /// check and a superset check, two store round trips minimum.
    pub fn set_equals(&self, other: &SetCache<T, S>) -> Result<bool, CacheError> {
        Ok(self.is_subset_of(other)? && self.is_superset_of(other)?)
    }

    // ---- relational tests against a local sequence ------------------

    /// Whether every member of self appears in `items`. Computed locally:
    /// the sequence is materialized and self is scanned against it.
    pub fn is_subset_of_items(&self, items: &[T]) -> Result<bool, CacheError> {
        let other: HashSet<String> = encode_all(items.iter())?.into_iter().collect();
        for member in self.members_raw()? {
            if !other.contains(&member) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Whether every element of `items` is a member of self.
    pub fn is_superset_of_items(&self, items: &[T]) -> Result<bool, CacheError> {
        for item in items {
            if !self.contains(item)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Subset of the sequence, and strictly smaller than its distinct
    /// element count.
    pub fn is_proper_subset_of_items(&self, items: &[T]) -> Result<bool, CacheError> {
        let other: HashSet<String> = encode_all(items.iter())?.into_iter().collect();
        if self.len()? >= other.len() {
            return Ok(false);
        }
        for member in self.members_raw()? {
            if !other.contains(&member) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Superset of the sequence, and strictly larger than its distinct
    /// element count.
    pub fn is_proper_superset_of_items(&self, items: &[T]) -> Result<bool, CacheError> {
        let other: HashSet<String> = encode_all(items.iter())?.into_iter().collect();
        if self.len()? <= other.len() {
            return Ok(false);
        }
        for member in &other {
            if !self.store.set_contains(&self.key, member)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Whether any element of `items` is a member of self.
    pub fn overlaps_items(&self, items: &[T]) -> Result<bool, CacheError> {
        for item in items {
            if self.contains(item)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether self holds exactly the distinct elements of `items`.
    pub fn set_equals_items(&self, items: &[T]) -> Result<bool, CacheError> {
        Ok(self.is_subset_of_items(items)? && self.is_superset_of_items(items)?)
    }

    // ---- internals ---------------------------------------------------

    fn combine_into_self(&self, op: SetCombine, other_key: &str) -> Result<(), CacheError> {
        self.store
            .set_combine_store(op, &self.key, &self.key, other_key)?;
        Ok(())
    }

    fn combine_with_items(&self, op: SetCombine, items: &[T]) -> Result<(), CacheError> {
        let other = self.materialize(items)?;
        self.combine_into_self(op, other.key())
    }

    /// Load a local sequence into a temporary set.
    fn materialize<'a>(&'a self, items: &[T]) -> Result<TempSet<'a, S>, CacheError> {
        let temp = TempSet::create(&self.store);
        let members = encode_all(items.iter())?;
        if !members.is_empty() {
            self.store.set_add_all(temp.key(), &members)?;
        }
        Ok(temp)
    }

    /// All members in encoded form, drained through the scan.
    fn members_raw(&self) -> Result<Vec<String>, CacheError> {
        let mut members = Vec::new();
        let mut cursor = 0;
        loop {
            let (next, page) = self.store.set_scan(&self.key, cursor)?;
            members.extend(page);
            if next == 0 {
                return Ok(members);
            }
            cursor = next;
        }
    }
}

fn encode_all<'a, T: Serialize + 'a>(
    items: impl Iterator<Item = &'a T>,
) -> Result<Vec<String>, CacheError> {
    items.map(codec::encode).collect()
}

/// Lazy member enumeration over a [`SetCache`].
pub struct SetIter<'a, T, S> {
    store: &'a S,
    key: &'a str,
    cursor: u64,
    buffer: VecDeque<String>,
    done: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T, S> Iterator for SetIter<'_, T, S>
where
    T: DeserializeOwned + Default,
    S: SetCommands,
{
    type Item = Result<T, CacheError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(member) = self.buffer.pop_front() {
                return Some(codec::decode(&member));
            }
            if self.done {
                return None;
            }
            match self.store.set_scan(self.key, self.cursor) {
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
    use farcache_store::HashCommands;
    use std::sync::Arc;

    fn pair(a: &[i64], b: &[i64]) -> (SetCache<i64, Arc<MemoryStore>>, SetCache<i64, Arc<MemoryStore>>) {
        let store = Arc::new(MemoryStore::new());
        let s1 = SetCache::new(Arc::clone(&store), "S1").unwrap();
        let s2 = SetCache::new(Arc::clone(&store), "S2").unwrap();
        s1.add_all(a).unwrap();
        s2.add_all(b).unwrap();
        (s1, s2)
    }

    fn sorted_members(s: &SetCache<i64, Arc<MemoryStore>>) -> Vec<i64> {
        let mut members: Vec<i64> = s.iter().collect::<Result<_, _>>().unwrap();
        members.sort();
        members
    }

    #[test]
    fn membership_basics() {
        let (s, _) = pair(&[1, 2], &[]);

        assert!(s.add(&3).unwrap());
        assert!(!s.add(&3).unwrap());
        assert!(s.contains(&3).unwrap());
        assert!(s.remove(&3).unwrap());
        assert!(!s.remove(&3).unwrap());
        assert_eq!(s.len().unwrap(), 2);
    }

    #[test]
    fn symmetric_difference_scenario() {
        let (s1, s2) = pair(&[1, 2, 3], &[2, 3, 4]);

        s1.symmetric_except_with(&s2).unwrap();

        assert_eq!(sorted_members(&s1), vec![1, 4]);
        // The other operand is untouched.
        assert_eq!(sorted_members(&s2), vec![2, 3, 4]);
    }

    #[test]
    fn symmetric_difference_is_self_inverse() {
        let (s1, s2) = pair(&[1, 2, 3], &[2, 3, 4]);

        s1.symmetric_except_with(&s2).unwrap();
        s1.symmetric_except_with(&s2).unwrap();

        assert_eq!(sorted_members(&s1), vec![1, 2, 3]);
    }

    #[test]
    fn symmetric_difference_leaves_no_temporary_keys() {
        let store = Arc::new(MemoryStore::new());
        let s1: SetCache<i64, _> = SetCache::new(Arc::clone(&store), "S1").unwrap();
        let s2: SetCache<i64, _> = SetCache::new(Arc::clone(&store), "S2").unwrap();
        s1.add_all(&[1, 2]).unwrap();
        s2.add_all(&[2, 3]).unwrap();

        s1.symmetric_except_with(&s2).unwrap();

        // Only the two named sets remain.
        assert_eq!(store.key_count(), 2);
    }

    #[test]
    fn temporary_set_is_cleaned_up_on_failure() {
        // Force the first choreography step to fail by making the other
        // operand's key the wrong kind.
        let store = Arc::new(MemoryStore::new());
        let s1: SetCache<i64, _> = SetCache::new(Arc::clone(&store), "S1").unwrap();
        let s2: SetCache<i64, _> = SetCache::new(Arc::clone(&store), "S2").unwrap();
        s1.add_all(&[1, 2]).unwrap();
        store.hash_set("Set:S2", "field", "value").unwrap();

        assert!(s1.symmetric_except_with(&s2).is_err());

        // S1 plus the poisoned S2 key; no temporary set left behind.
        assert_eq!(store.key_count(), 2);
    }

    #[test]
    fn union_then_superset_holds() {
        let (s1, s2) = pair(&[1, 2], &[2, 3]);

        s1.union_with(&s2).unwrap();
        assert!(s1.is_superset_of(&s2).unwrap());
        assert_eq!(sorted_members(&s1), vec![1, 2, 3]);
    }

    #[test]
    fn except_and_intersect_write_back_into_self() {
        let (s1, s2) = pair(&[1, 2, 3], &[2, 3, 4]);

        s1.intersect_with(&s2).unwrap();
        assert_eq!(sorted_members(&s1), vec![2, 3]);

        s1.except_with(&s2).unwrap();
        assert!(s1.is_empty().unwrap());
    }

    #[test]
    fn relational_tests_between_adapters() {
        let (s1, s2) = pair(&[1, 2], &[1, 2, 3]);

        assert!(s1.is_subset_of(&s2).unwrap());
        assert!(s1.is_proper_subset_of(&s2).unwrap());
        assert!(s2.is_superset_of(&s1).unwrap());
        assert!(s2.is_proper_superset_of(&s1).unwrap());
        assert!(s1.overlaps(&s2).unwrap());
        assert!(!s1.set_equals(&s2).unwrap());
    }

    #[test]
    fn set_equals_is_reflexive() {
        let (s1, _) = pair(&[1, 2, 3], &[]);
        assert!(s1.set_equals(&s1).unwrap());
    }

    #[test]
    fn relational_tests_against_local_sequences() {
        let (s1, _) = pair(&[1, 2], &[]);

        assert!(s1.is_subset_of_items(&[1, 2, 3]).unwrap());
        assert!(s1.is_proper_subset_of_items(&[1, 2, 3]).unwrap());
        assert!(!s1.is_subset_of_items(&[1]).unwrap());
        assert!(s1.is_superset_of_items(&[1]).unwrap());
        assert!(s1.is_proper_superset_of_items(&[1]).unwrap());
        assert!(!s1.is_proper_superset_of_items(&[1, 2]).unwrap());
        assert!(s1.overlaps_items(&[0, 2]).unwrap());
        assert!(!s1.overlaps_items(&[5, 6]).unwrap());
        assert!(s1.set_equals_items(&[2, 1]).unwrap());
        assert!(!s1.set_equals_items(&[1, 2, 3]).unwrap());
    }

    #[test]
    fn algebra_against_local_sequences() {
        let store = Arc::new(MemoryStore::new());
        let s: SetCache<i64, _> = SetCache::new(Arc::clone(&store), "S").unwrap();
        s.add_all(&[1, 2, 3]).unwrap();

        s.union_with_items(&[3, 4]).unwrap();
        assert_eq!(sorted_members(&s), vec![1, 2, 3, 4]);

        s.except_with_items(&[1]).unwrap();
        assert_eq!(sorted_members(&s), vec![2, 3, 4]);

        s.intersect_with_items(&[2, 4, 9]).unwrap();
        assert_eq!(sorted_members(&s), vec![2, 4]);

        s.symmetric_except_with_items(&[4, 5]).unwrap();
        assert_eq!(sorted_members(&s), vec![2, 5]);

        // Scratch sets are gone; only "Set:S" remains.
        assert_eq!(store.key_count(), 1);
    }

    #[test]
    fn clear_then_empty() {
        let (s1, _) = pair(&[1, 2, 3], &[]);

        s1.clear().unwrap();
        assert_eq!(s1.len().unwrap(), 0);
        assert_eq!(s1.iter().count(), 0);
    }
}
