//! Collection factory.

use farcache_store::StoreCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{
    CacheError, DictionaryCache, ListCache, QueueCache, SetCache, StackCache, ValueCache,
};

/// Stateless constructor for named collection adapters over one store
/// client.
///
/// Each call hands out a fresh adapter bound to the deterministic key for
/// its (kind, name) - there is no registry and no instance caching, so two
/// calls with the same arguments yield independent adapters over the same
/// underlying collection.
///
/// # Example
///
/// ```rust
/// use farcache_collections::CollectionFactory;
/// use farcache_memory::MemoryStore;
/// use std::sync::Arc;
///
/// let factory = CollectionFactory::new(Arc::new(MemoryStore::new()));
///
/// let scores = factory.dictionary::<String, i64>("scores").unwrap();
/// let jobs = factory.queue::<String>("jobs").unwrap();
///
/// scores.set(&"alice".to_string(), &10).unwrap();
/// jobs.enqueue(&"recount".to_string()).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CollectionFactory<S> {
    store: S,
}

impl<S: StoreCommands + Clone> CollectionFactory<S> {
    /// Build a factory over a store client. The client is cloned into each
    /// adapter, so a cheaply cloneable handle (`Arc`, a pooled client) is
    /// expected.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// A dictionary adapter over `"Dictionary:<name>"`.
    pub fn dictionary<K, V>(&self, name: &str) -> Result<DictionaryCache<K, V, S>, CacheError>
    where
        K: Serialize + DeserializeOwned + Default,
        V: Serialize + DeserializeOwned + Default,
    {
        DictionaryCache::new(self.store.clone(), name)
    }

    /// A list adapter over `"List:<name>"`.
    pub fn list<T>(&self, name: &str) -> Result<ListCache<T, S>, CacheError>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        ListCache::new(self.store.clone(), name)
    }

    /// A set adapter over `"Set:<name>"`.
    pub fn set<T>(&self, name: &str) -> Result<SetCache<T, S>, CacheError>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        SetCache::new(self.store.clone(), name)
    }

    /// A stack adapter over `"Stack:<name>"`.
    pub fn stack<T>(&self, name: &str) -> Result<StackCache<T, S>, CacheError>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        StackCache::new(self.store.clone(), name)
    }

    /// A queue adapter over `"Queue:<name>"`.
    pub fn queue<T>(&self, name: &str) -> Result<QueueCache<T, S>, CacheError>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        QueueCache::new(self.store.clone(), name)
    }

    /// The plain keyed value cache over the same client.
    pub fn value_cache(&self) -> ValueCache<S> {
        ValueCache::new(self.store.clone())
    }
}
