//! In-process store implementing the farcache command traits.
//!
//! `MemoryStore` keeps all collections in a mutex-guarded map, one entry per
//! key, typed by collection kind the way the remote store types its values.
//! It reproduces the server behaviors the collection layer depends on:
//! wrong-type errors, the fixed `ERR index out of range` text for list
//! index writes, lazy key expiry, cursor-paged scans, and key deletion when
//! a stored set combination comes out empty.
//!
//! It exists for tests and single-process use; every command takes the lock
//! once, so commands are atomic exactly like single server round trips.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use farcache_store::{
    HashCommands, KeyCommands, ListCommands, SetCombine, SetCommands, StoreError, ValueCommands,
};

/// Members returned per scan page.
const SCAN_PAGE: usize = 64;

#[derive(Debug, Clone)]
enum Entry {
    Value(String),
    Hash(HashMap<String, String>),
    List(VecDeque<String>),
    Set(HashSet<String>),
}

impl Entry {
    fn kind(&self) -> &'static str {
        match self {
            Entry::Value(_) => "string",
            Entry::Hash(_) => "hash",
            Entry::List(_) => "list",
            Entry::Set(_) => "set",
        }
    }
}

#[derive(Debug)]
struct Stored {
    entry: Entry,
    expires_at: Option<SystemTime>,
}

impl Stored {
    fn new(entry: Entry) -> Self {
        Self {
            entry,
            expires_at: None,
        }
    }

    fn expired(&self, now: SystemTime) -> bool {
        matches!(self.expires_at, Some(deadline) if deadline <= now)
    }
}

/// An in-memory store speaking the full farcache command surface.
///
/// # Example
///
/// ```rust
/// use farcache_memory::MemoryStore;
/// use farcache_store::{SetCommands, ValueCommands};
///
/// let store = MemoryStore::new();
/// store.value_set("greeting", "\"hello\"").unwrap();
/// store.set_add("Set:colors", "\"red\"").unwrap();
///
/// assert!(store.set_contains("Set:colors", "\"red\"").unwrap());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Stored>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys of any kind.
    pub fn key_count(&self) -> usize {
        let mut entries = self.entries.lock().unwrap();
        purge_expired(&mut entries);
        entries.len()
    }
}

fn purge_expired(entries: &mut HashMap<String, Stored>) {
    let now = SystemTime::now();
    entries.retain(|_, stored| !stored.expired(now));
}

/// Drop the key if it expired, so expired keys read as absent.
fn purge_key(entries: &mut HashMap<String, Stored>, key: &str) {
    let now = SystemTime::now();
    if entries.get(key).is_some_and(|stored| stored.expired(now)) {
        entries.remove(key);
    }
}

fn wrong_type(expected: &'static str) -> StoreError {
    StoreError::WrongType { expected }
}

fn hash_of<'a>(
    entries: &'a HashMap<String, Stored>,
    key: &str,
) -> Result<Option<&'a HashMap<String, String>>, StoreError> {
    match entries.get(key).map(|s| &s.entry) {
        None => Ok(None),
        Some(Entry::Hash(map)) => Ok(Some(map)),
        Some(_) => Err(wrong_type("hash")),
    }
}

fn list_of<'a>(
    entries: &'a HashMap<String, Stored>,
    key: &str,
) -> Result<Option<&'a VecDeque<String>>, StoreError> {
    match entries.get(key).map(|s| &s.entry) {
        None => Ok(None),
        Some(Entry::List(list)) => Ok(Some(list)),
        Some(_) => Err(wrong_type("list")),
    }
}

fn set_of<'a>(
    entries: &'a HashMap<String, Stored>,
    key: &str,
) -> Result<Option<&'a HashSet<String>>, StoreError> {
    match entries.get(key).map(|s| &s.entry) {
        None => Ok(None),
        Some(Entry::Set(set)) => Ok(Some(set)),
        Some(_) => Err(wrong_type("set")),
    }
}

/// Resolve a possibly negative index against a length. Returns `None` when
/// the index falls outside `[0, len)`.
fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let resolved = if index < 0 { len + index } else { index };
    if (0..len).contains(&resolved) {
        Some(resolved as usize)
    } else {
        None
    }
}

/// One page of a scan over a sorted member snapshot.
///
/// Sorting makes the cursor stable across calls as long as the collection
/// is not mutated; mutations mid-scan may skip or repeat members, which is
/// the same guarantee the server gives.
fn scan_page<T: Clone + Ord>(mut members: Vec<T>, cursor: u64) -> (u64, Vec<T>) {
    members.sort();
    let start = cursor as usize;
    if start >= members.len() {
        return (0, Vec::new());
    }
    let end = (start + SCAN_PAGE).min(members.len());
    let next = if end == members.len() { 0 } else { end as u64 };
    (next, members[start..end].to_vec())
}

impl HashCommands for MemoryStore {
    fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        Ok(hash_of(&entries, key)?.and_then(|map| map.get(field).cloned()))
    }

    fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        let stored = entries
            .entry(key.to_string())
            .or_insert_with(|| Stored::new(Entry::Hash(HashMap::new())));
        match &mut stored.entry {
            Entry::Hash(map) => Ok(map.insert(field.to_string(), value.to_string()).is_none()),
            _ => Err(wrong_type("hash")),
        }
    }

    fn hash_delete(&self, key: &str, field: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        let Some(stored) = entries.get_mut(key) else {
            return Ok(false);
        };
        match &mut stored.entry {
            Entry::Hash(map) => {
                let removed = map.remove(field).is_some();
                if map.is_empty() {
                    entries.remove(key);
                }
                Ok(removed)
            }
            _ => Err(wrong_type("hash")),
        }
    }

    fn hash_exists(&self, key: &str, field: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        Ok(hash_of(&entries, key)?.is_some_and(|map| map.contains_key(field)))
    }

    fn hash_len(&self, key: &str) -> Result<u64, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        Ok(hash_of(&entries, key)?.map_or(0, |map| map.len() as u64))
    }

    fn hash_keys(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        Ok(hash_of(&entries, key)?.map_or_else(Vec::new, |map| map.keys().cloned().collect()))
    }

    fn hash_values(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        Ok(hash_of(&entries, key)?.map_or_else(Vec::new, |map| map.values().cloned().collect()))
    }

    fn hash_scan(
        &self,
        key: &str,
        cursor: u64,
    ) -> Result<(u64, Vec<(String, String)>), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        let members = hash_of(&entries, key)?.map_or_else(Vec::new, |map| {
            map.iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Vec<_>>()
        });
        Ok(scan_page(members, cursor))
    }
}

impl ListCommands for MemoryStore {
    fn list_index(&self, key: &str, index: i64) -> Result<Option<String>, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        let Some(list) = list_of(&entries, key)? else {
            return Ok(None);
        };
        Ok(resolve_index(index, list.len()).and_then(|i| list.get(i).cloned()))
    }

    fn list_set(&self, key: &str, index: i64, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        let Some(stored) = entries.get_mut(key) else {
            return Err(StoreError::Server {
                message: "ERR no such key".to_string(),
            });
        };
        match &mut stored.entry {
            Entry::List(list) => {
                let len = list.len();
                let Some(i) = resolve_index(index, len) else {
                    return Err(StoreError::index_out_of_range());
                };
                list[i] = value.to_string();
                Ok(())
            }
            _ => Err(wrong_type("list")),
        }
    }

    fn list_push_tail(&self, key: &str, value: &str) -> Result<u64, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        let stored = entries
            .entry(key.to_string())
            .or_insert_with(|| Stored::new(Entry::List(VecDeque::new())));
        match &mut stored.entry {
            Entry::List(list) => {
                list.push_back(value.to_string());
                Ok(list.len() as u64)
            }
            _ => Err(wrong_type("list")),
        }
    }

    fn list_pop_tail(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.list_pop(key, false)
    }

    fn list_pop_head(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.list_pop(key, true)
    }

    fn list_len(&self, key: &str) -> Result<u64, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        Ok(list_of(&entries, key)?.map_or(0, |list| list.len() as u64))
    }

    fn list_remove(&self, key: &str, value: &str, count: i64) -> Result<u64, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        let Some(stored) = entries.get_mut(key) else {
            return Ok(0);
        };
        let Entry::List(list) = &mut stored.entry else {
            return Err(wrong_type("list"));
        };

        let limit = if count == 0 {
            usize::MAX
        } else {
            count.unsigned_abs() as usize
        };
        let mut removed = 0usize;
        if count < 0 {
            // Scan from the tail.
            let mut i = list.len();
            while i > 0 && removed < limit {
                i -= 1;
                if list[i] == value {
                    list.remove(i);
                    removed += 1;
                }
            }
        } else {
            let mut i = 0;
            while i < list.len() && removed < limit {
                if list[i] == value {
                    list.remove(i);
                    removed += 1;
                } else {
                    i += 1;
                }
            }
        }
        if list.is_empty() {
            entries.remove(key);
        }
        Ok(removed as u64)
    }

    fn list_range(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        let Some(list) = list_of(&entries, key)? else {
            return Ok(Vec::new());
        };
        let len = list.len() as i64;
        if len == 0 {
            return Ok(Vec::new());
        }
        let resolve = |i: i64| -> i64 { if i < 0 { len + i } else { i } };
        // A start past the end yields nothing; only the stop is clamped.
        let start = resolve(start).max(0);
        let stop = resolve(stop).min(len - 1);
        if start >= len || start > stop {
            return Ok(Vec::new());
        }
        Ok((start..=stop)
            .map(|i| list[i as usize].clone())
            .collect())
    }
}

impl MemoryStore {
    fn list_pop(&self, key: &str, head: bool) -> Result<Option<String>, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        let Some(stored) = entries.get_mut(key) else {
            return Ok(None);
        };
        let Entry::List(list) = &mut stored.entry else {
            return Err(wrong_type("list"));
        };
        let popped = if head {
            list.pop_front()
        } else {
            list.pop_back()
        };
        if list.is_empty() {
            entries.remove(key);
        }
        Ok(popped)
    }

    fn combine(
        entries: &HashMap<String, Stored>,
        op: SetCombine,
        first: &str,
        second: &str,
    ) -> Result<HashSet<String>, StoreError> {
        let empty = HashSet::new();
        let a = set_of(entries, first)?.unwrap_or(&empty);
        let b = set_of(entries, second)?.unwrap_or(&empty);
        let result = match op {
            SetCombine::Union => a.union(b).cloned().collect(),
            SetCombine::Intersect => a.intersection(b).cloned().collect(),
            SetCombine::Difference => a.difference(b).cloned().collect(),
        };
        Ok(result)
    }
}

impl SetCommands for MemoryStore {
    fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        let stored = entries
            .entry(key.to_string())
            .or_insert_with(|| Stored::new(Entry::Set(HashSet::new())));
        match &mut stored.entry {
            Entry::Set(set) => Ok(set.insert(member.to_string())),
            _ => Err(wrong_type("set")),
        }
    }

    fn set_add_all(&self, key: &str, members: &[String]) -> Result<u64, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        let stored = entries
            .entry(key.to_string())
            .or_insert_with(|| Stored::new(Entry::Set(HashSet::new())));
        match &mut stored.entry {
            Entry::Set(set) => {
                let added = members
                    .iter()
                    .filter(|member| set.insert((*member).clone()))
                    .count();
                Ok(added as u64)
            }
            _ => Err(wrong_type("set")),
        }
    }

    fn set_remove(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        let Some(stored) = entries.get_mut(key) else {
            return Ok(false);
        };
        match &mut stored.entry {
            Entry::Set(set) => {
                let removed = set.remove(member);
                if set.is_empty() {
                    entries.remove(key);
                }
                Ok(removed)
            }
            _ => Err(wrong_type("set")),
        }
    }

    fn set_contains(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        Ok(set_of(&entries, key)?.is_some_and(|set| set.contains(member)))
    }

    fn set_len(&self, key: &str) -> Result<u64, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        Ok(set_of(&entries, key)?.map_or(0, |set| set.len() as u64))
    }

    fn set_scan(&self, key: &str, cursor: u64) -> Result<(u64, Vec<String>), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        let members =
            set_of(&entries, key)?.map_or_else(Vec::new, |set| set.iter().cloned().collect());
        Ok(scan_page(members, cursor))
    }

    fn set_combine(
        &self,
        op: SetCombine,
        first: &str,
        second: &str,
    ) -> Result<Vec<String>, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, first);
        purge_key(&mut entries, second);
        Ok(Self::combine(&entries, op, first, second)?
            .into_iter()
            .collect())
    }

    fn set_combine_store(
        &self,
        op: SetCombine,
        destination: &str,
        first: &str,
        second: &str,
    ) -> Result<u64, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, first);
        purge_key(&mut entries, second);
        let result = Self::combine(&entries, op, first, second)?;
        let len = result.len() as u64;
        // The server deletes the destination when the result is empty.
        if result.is_empty() {
            entries.remove(destination);
        } else {
            entries.insert(destination.to_string(), Stored::new(Entry::Set(result)));
        }
        Ok(len)
    }
}

impl KeyCommands for MemoryStore {
    fn key_exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        Ok(entries.contains_key(key))
    }

    fn key_delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        Ok(entries.remove(key).is_some())
    }

    fn key_expire_at(&self, key: &str, deadline: SystemTime) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        match entries.get_mut(key) {
            Some(stored) => {
                stored.expires_at = Some(deadline);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn key_expire_in(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        self.key_expire_at(key, SystemTime::now() + ttl)
    }
}

impl ValueCommands for MemoryStore {
    fn value_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        match entries.get(key).map(|s| &s.entry) {
            None => Ok(None),
            Some(Entry::Value(text)) => Ok(Some(text.clone())),
            Some(entry) => Err(wrong_type(entry.kind())),
        }
    }

    fn value_set(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        // An unconditional set replaces whatever was there, expiry included.
        entries.insert(key.to_string(), Stored::new(Entry::Value(value.to_string())));
        Ok(true)
    }

    fn value_incr_by(&self, key: &str, amount: i64) -> Result<i64, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        purge_key(&mut entries, key);
        let current = match entries.get(key).map(|s| &s.entry) {
            None => 0,
            Some(Entry::Value(text)) => {
                text.parse::<i64>().map_err(|_| StoreError::Server {
                    message: "ERR value is not an integer or out of range".to_string(),
                })?
            }
            Some(_) => return Err(wrong_type("string")),
        };
        let next = current + amount;
        match entries.get_mut(key) {
            Some(stored) => stored.entry = Entry::Value(next.to_string()),
            None => {
                entries.insert(key.to_string(), Stored::new(Entry::Value(next.to_string())));
            }
        }
        Ok(next)
    }

    fn value_decr_by(&self, key: &str, amount: i64) -> Result<i64, StoreError> {
        self.value_incr_by(key, -amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_set_reports_newness() {
        let store = MemoryStore::new();

        assert!(store.hash_set("h", "a", "1").unwrap());
        assert!(!store.hash_set("h", "a", "2").unwrap());
        assert_eq!(store.hash_get("h", "a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.hash_len("h").unwrap(), 1);
    }

    #[test]
    fn hash_delete_drops_empty_key() {
        let store = MemoryStore::new();

        store.hash_set("h", "a", "1").unwrap();
        assert!(store.hash_delete("h", "a").unwrap());
        assert!(!store.key_exists("h").unwrap());
        assert!(!store.hash_delete("h", "a").unwrap());
    }

    #[test]
    fn list_set_out_of_range_uses_server_text() {
        let store = MemoryStore::new();
        store.list_push_tail("l", "x").unwrap();

        let err = store.list_set("l", 5, "y").unwrap_err();
        assert!(err.is_index_out_of_range());

        // Negative indexes resolve from the tail.
        store.list_set("l", -1, "z").unwrap();
        assert_eq!(store.list_index("l", 0).unwrap().as_deref(), Some("z"));
    }

    #[test]
    fn list_remove_all_occurrences() {
        let store = MemoryStore::new();
        for v in ["a", "b", "a", "c", "a"] {
            store.list_push_tail("l", v).unwrap();
        }

        assert_eq!(store.list_remove("l", "a", 0).unwrap(), 3);
        assert_eq!(store.list_range("l", 0, -1).unwrap(), vec!["b", "c"]);
    }

    #[test]
    fn list_remove_bounded_from_head() {
        let store = MemoryStore::new();
        for v in ["a", "b", "a", "a"] {
            store.list_push_tail("l", v).unwrap();
        }

        assert_eq!(store.list_remove("l", "a", 2).unwrap(), 2);
        assert_eq!(store.list_range("l", 0, -1).unwrap(), vec!["b", "a"]);
    }

    #[test]
    fn list_pops_and_empty_cleanup() {
        let store = MemoryStore::new();
        store.list_push_tail("l", "first").unwrap();
        store.list_push_tail("l", "last").unwrap();

        assert_eq!(store.list_pop_head("l").unwrap().as_deref(), Some("first"));
        assert_eq!(store.list_pop_tail("l").unwrap().as_deref(), Some("last"));
        assert_eq!(store.list_pop_tail("l").unwrap(), None);
        assert!(!store.key_exists("l").unwrap());
    }

    #[test]
    fn range_clamps_out_of_bounds() {
        let store = MemoryStore::new();
        for v in ["a", "b", "c"] {
            store.list_push_tail("l", v).unwrap();
        }

        assert_eq!(store.list_range("l", -1, -1).unwrap(), vec!["c"]);
        assert_eq!(store.list_range("l", 0, 100).unwrap(), vec!["a", "b", "c"]);
        // A start at or past the end yields nothing, never the last element.
        assert!(store.list_range("l", 5, 10).unwrap().is_empty());
        assert!(store.list_range("l", 3, 5).unwrap().is_empty());
    }

    #[test]
    fn combine_store_deletes_empty_destination() {
        let store = MemoryStore::new();
        store.set_add("a", "1").unwrap();
        store.set_add("b", "1").unwrap();
        store.set_add("dest", "stale").unwrap();

        let len = store
            .set_combine_store(SetCombine::Difference, "dest", "a", "b")
            .unwrap();
        assert_eq!(len, 0);
        assert!(!store.key_exists("dest").unwrap());
    }

    #[test]
    fn combine_union_and_intersect() {
        let store = MemoryStore::new();
        store
            .set_add_all("a", &["1".into(), "2".into(), "3".into()])
            .unwrap();
        store
            .set_add_all("b", &["2".into(), "3".into(), "4".into()])
            .unwrap();

        let mut union = store.set_combine(SetCombine::Union, "a", "b").unwrap();
        union.sort();
        assert_eq!(union, vec!["1", "2", "3", "4"]);

        let mut inter = store.set_combine(SetCombine::Intersect, "a", "b").unwrap();
        inter.sort();
        assert_eq!(inter, vec!["2", "3"]);
    }

    #[test]
    fn wrong_type_is_reported() {
        let store = MemoryStore::new();
        store.set_add("s", "member").unwrap();

        assert!(matches!(
            store.list_push_tail("s", "x").unwrap_err(),
            StoreError::WrongType { expected: "list" }
        ));
        assert!(matches!(
            store.hash_get("s", "f").unwrap_err(),
            StoreError::WrongType { expected: "hash" }
        ));
    }

    #[test]
    fn expired_key_reads_as_absent() {
        let store = MemoryStore::new();
        store.value_set("k", "v").unwrap();
        store
            .key_expire_at("k", SystemTime::now() - Duration::from_secs(1))
            .unwrap();

        assert!(!store.key_exists("k").unwrap());
        assert_eq!(store.value_get("k").unwrap(), None);
    }

    #[test]
    fn expire_missing_key_reports_false() {
        let store = MemoryStore::new();
        assert!(!store.key_expire_in("nope", Duration::from_secs(5)).unwrap());
    }

    #[test]
    fn increment_from_absent_key_starts_at_zero() {
        let store = MemoryStore::new();
        assert_eq!(store.value_incr_by("n", 10).unwrap(), 10);
        assert_eq!(store.value_decr_by("n", 3).unwrap(), 7);
    }

    #[test]
    fn increment_non_integer_is_server_error() {
        let store = MemoryStore::new();
        store.value_set("n", "not a number").unwrap();
        assert!(matches!(
            store.value_incr_by("n", 1).unwrap_err(),
            StoreError::Server { .. }
        ));
    }

    #[test]
    fn scan_pages_terminate() {
        let store = MemoryStore::new();
        let members: Vec<String> = (0..150).map(|i| format!("{i:04}")).collect();
        store.set_add_all("s", &members).unwrap();

        let mut seen = Vec::new();
        let mut cursor = 0;
        loop {
            let (next, page) = store.set_scan("s", cursor).unwrap();
            seen.extend(page);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        assert_eq!(seen.len(), 150);
        assert_eq!(seen, members);
    }
}
