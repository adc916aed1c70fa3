//! Async twins of the key and value command traits.
//!
//! The async calling convention carries the exact same contract as the sync
//! one; only the suspension behavior differs. Enable the `async` feature to
//! use these traits:
//!
//! ```toml
//! [dependencies]
//! farcache-store = { version = "0.1", features = ["async"] }
//! ```

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;

use crate::{KeyCommands, StoreError, ValueCommands};

/// Async version of [`KeyCommands`].
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn AsyncKeyCommands>`.
#[async_trait]
pub trait AsyncKeyCommands: Send + Sync {
    /// Whether the key exists.
    async fn key_exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Delete the key and its value. Returns whether the key existed.
    async fn key_delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Expire the key at an absolute wall-clock time.
    async fn key_expire_at(&self, key: &str, deadline: SystemTime) -> Result<bool, StoreError>;

    /// Expire the key after a relative duration.
    async fn key_expire_in(&self, key: &str, ttl: Duration) -> Result<bool, StoreError>;
}

/// Async version of [`ValueCommands`].
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn AsyncValueCommands>`.
#[async_trait]
pub trait AsyncValueCommands: Send + Sync {
    /// Read the value, or `Ok(None)` when the key is absent.
    async fn value_get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write the value unconditionally.
    async fn value_set(&self, key: &str, value: &str) -> Result<bool, StoreError>;

    /// Atomically add `amount` to the integer at `key`; absent keys count
    /// from zero. Returns the new value.
    async fn value_incr_by(&self, key: &str, amount: i64) -> Result<i64, StoreError>;

    /// Atomically subtract `amount` from the integer at `key`; absent keys
    /// count from zero. Returns the new value.
    async fn value_decr_by(&self, key: &str, amount: i64) -> Result<i64, StoreError>;
}

#[async_trait]
impl<T: AsyncKeyCommands + ?Sized> AsyncKeyCommands for Arc<T> {
    async fn key_exists(&self, key: &str) -> Result<bool, StoreError> {
        (**self).key_exists(key).await
    }
    async fn key_delete(&self, key: &str) -> Result<bool, StoreError> {
        (**self).key_delete(key).await
    }
    async fn key_expire_at(&self, key: &str, deadline: SystemTime) -> Result<bool, StoreError> {
        (**self).key_expire_at(key, deadline).await
    }
    async fn key_expire_in(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        (**self).key_expire_in(key, ttl).await
    }
}

#[async_trait]
impl<T: AsyncValueCommands + ?Sized> AsyncValueCommands for Arc<T> {
    async fn value_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).value_get(key).await
    }
    async fn value_set(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        (**self).value_set(key, value).await
    }
    async fn value_incr_by(&self, key: &str, amount: i64) -> Result<i64, StoreError> {
        (**self).value_incr_by(key, amount).await
    }
    async fn value_decr_by(&self, key: &str, amount: i64) -> Result<i64, StoreError> {
        (**self).value_decr_by(key, amount).await
    }
}

/// Adapter to expose a sync store through the async traits.
///
/// The wrapped store's commands run inline on the calling task; this is
/// intended for in-process stores and tests. A real network client should
/// implement the async traits directly against its own transport.
#[derive(Debug, Clone)]
pub struct SyncToAsync<T> {
    inner: T,
}

impl<T> SyncToAsync<T> {
    /// Wrap a sync store.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Access the wrapped store.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Unwrap into the inner store.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[async_trait]
impl<T: KeyCommands> AsyncKeyCommands for SyncToAsync<T> {
    async fn key_exists(&self, key: &str) -> Result<bool, StoreError> {
        self.inner.key_exists(key)
    }
    async fn key_delete(&self, key: &str) -> Result<bool, StoreError> {
        self.inner.key_delete(key)
    }
    async fn key_expire_at(&self, key: &str, deadline: SystemTime) -> Result<bool, StoreError> {
        self.inner.key_expire_at(key, deadline)
    }
    async fn key_expire_in(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        self.inner.key_expire_in(key, ttl)
    }
}

#[async_trait]
impl<T: ValueCommands> AsyncValueCommands for SyncToAsync<T> {
    async fn value_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.value_get(key)
    }
    async fn value_set(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        self.inner.value_set(key, value)
    }
    async fn value_incr_by(&self, key: &str, amount: i64) -> Result<i64, StoreError> {
        self.inner.value_incr_by(key, amount)
    }
    async fn value_decr_by(&self, key: &str, amount: i64) -> Result<i64, StoreError> {
        self.inner.value_decr_by(key, amount)
    }
}
