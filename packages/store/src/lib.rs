//! farcache-store: Store Capability Traits
//!
//! This is the narrow waist of the farcache stack. Everything at this level
//! is a direct command against the remote store - no collection semantics,
//! no serialization, no key-naming conventions. One trait method equals one
//! server round trip.
//!
//! The collection layer (`farcache-collections`) builds dictionary, list,
//! set, stack and queue semantics on top of these commands; store clients
//! (or the in-process `farcache-memory`) implement them.
//!
//! # Example
//!
//! ```rust
//! use farcache_store::{StoreError, ValueCommands};
//!
//! fn bump_hits(store: &dyn ValueCommands) -> Result<i64, StoreError> {
//!     store.value_incr_by("hits", 1)
//! }
//! ```
//!
//! # Async Support
//!
//! Enable the `async` feature for async trait variants:
//!
//! ```toml
//! [dependencies]
//! farcache-store = { version = "0.1", features = ["async"] }
//! ```
//!
//! Then use `AsyncKeyCommands`, `AsyncValueCommands`, and `SyncToAsync`.

mod error;
mod traits;

pub use error::{StoreError, INDEX_OUT_OF_RANGE_TEXT};
pub use traits::{
    HashCommands, KeyCommands, ListCommands, SetCombine, SetCommands, StoreCommands,
    ValueCommands,
};

#[cfg(feature = "async")]
mod async_traits;

#[cfg(feature = "async")]
pub use async_traits::{AsyncKeyCommands, AsyncValueCommands, SyncToAsync};
