//! farcache-collections: Shared Collections over a Remote Store
//!
//! Typed dictionary, list, set, stack and queue adapters whose state lives
//! in a remote key-value store instead of process memory. Each adapter
//! binds a collection name to a deterministic store key (`"Dictionary:x"`,
//! `"List:x"`, ...), serializes elements as JSON text, and translates each
//! operation into the store commands of `farcache-store`. Any two processes
//! that share a store and a name share the collection.
//!
//! Adapters hold no local state beyond the key, so there is no cache
//! coherence problem - every read and write goes to the store. The flip
//! side is that multi-command operations are not atomic; methods document
//! their races where they have them.
//!
//! # Example
//!
//! ```rust
//! use farcache_collections::CollectionFactory;
//! use farcache_memory::MemoryStore;
//! use std::sync::Arc;
//!
//! let factory = CollectionFactory::new(Arc::new(MemoryStore::new()));
//!
//! let scores = factory.dictionary::<String, i64>("scores").unwrap();
//! scores.set(&"alice".to_string(), &10).unwrap();
//! assert_eq!(scores.get(&"alice".to_string()).unwrap(), 10);
//!
//! let tags = factory.set::<String>("tags").unwrap();
//! tags.add(&"rust".to_string()).unwrap();
//! assert!(tags.contains(&"rust".to_string()).unwrap());
//! ```
//!
//! # Async Support
//!
//! Enable the `async` feature for [`AsyncValueCache`], the async twin of
//! the plain value cache, driven through `farcache-store`'s async traits.

pub mod codec;

mod dictionary;
mod error;
mod factory;
mod iter;
mod key;
mod list;
mod queue;
mod set;
mod stack;
mod value_cache;

pub use dictionary::{DictionaryCache, DictionaryIter};
pub use error::CacheError;
pub use factory::CollectionFactory;
pub use iter::IndexIter;
pub use key::{collection_key, CollectionKind};
pub use list::ListCache;
pub use queue::QueueCache;
pub use set::{SetCache, SetIter};
pub use stack::StackCache;
pub use value_cache::ValueCache;

#[cfg(feature = "async")]
mod async_value_cache;

#[cfg(feature = "async")]
pub use async_value_cache::AsyncValueCache;
