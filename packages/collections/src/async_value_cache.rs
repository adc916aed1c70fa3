//! Async twin of [`ValueCache`](crate::ValueCache).
//!
//! Same contract, suspension instead of blocking. Enable the `async`
//! feature to use it:
//!
//! ```toml
//! [dependencies]
//! farcache-collections = { version = "0.1", features = ["async"] }
//! ```

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use farcache_store::{AsyncKeyCommands, AsyncValueCommands};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{codec, CacheError};

fn require_key(key: &str) -> Result<(), CacheError> {
    if key.is_empty() {
        return Err(CacheError::NullArgument { argument: "key" });
    }
    Ok(())
}

/// A typed cache over plain store keys, driven through the async command
/// traits.
///
/// Method for method this mirrors [`ValueCache`](crate::ValueCache); see
/// that type for the per-operation contract.
#[derive(Debug, Clone)]
pub struct AsyncValueCache<S> {
    store: S,
}

impl<S: AsyncValueCommands + AsyncKeyCommands> AsyncValueCache<S> {
    /// Build a cache over an async store client.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Whether the key exists.
    pub async fn contains_key(&self, key: &str) -> Result<bool, CacheError> {
        require_key(key)?;
        Ok(self.store.key_exists(key).await?)
    }

    /// Read the value at `key`. A missing or empty value reads as the
    /// type's zero value.
    pub async fn get<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, CacheError> {
        require_key(key)?;
        let text = self.store.value_get(key).await?;
        codec::decode_opt(text.as_deref())
    }

    /// Read many keys, one round trip each.
    pub async fn get_all<T: DeserializeOwned + Default>(
        &self,
        keys: &[&str],
    ) -> Result<HashMap<String, T>, CacheError> {
        let mut values = HashMap::with_capacity(keys.len());
        for key in keys {
            values.insert((*key).to_string(), self.get(key).await?);
        }
        Ok(values)
    }

    /// Write `value` at `key` regardless of whether it already exists.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<bool, CacheError> {
        require_key(key)?;
        let text = codec::encode(value)?;
        Ok(self.store.value_set(key, &text).await?)
    }

    /// [`set`](Self::set), then expire the key at an absolute time.
    pub async fn set_expires_at<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expires_at: SystemTime,
    ) -> Result<bool, CacheError> {
        if !self.set(key, value).await? {
            return Ok(false);
        }
        Ok(self.store.key_expire_at(key, expires_at).await?)
    }

    /// [`set`](Self::set), then expire the key after a duration.
    pub async fn set_expires_in<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expires_in: Duration,
    ) -> Result<bool, CacheError> {
        if !self.set(key, value).await? {
            return Ok(false);
        }
        Ok(self.store.key_expire_in(key, expires_in).await?)
    }

    /// Write every entry, one round trip each.
    pub async fn set_all<T: Serialize>(
        &self,
        values: &HashMap<String, T>,
    ) -> Result<(), CacheError> {
        for (key, value) in values {
            self.set(key, value).await?;
        }
        Ok(())
    }

    /// Write `value` only when `key` is absent. Reports success without
    /// writing when the key already exists.
    ///
    /// Check-then-set; a concurrent writer can slip between the check and
    /// the write.
    pub async fn add<T: Serialize>(&self, key: &str, value: &T) -> Result<bool, CacheError> {
        if self.contains_key(key).await? {
            return Ok(true);
        }
        self.set(key, value).await
    }

    /// [`add`](Self::add) with an absolute expiry on a fresh write.
    pub async fn add_expires_at<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expires_at: SystemTime,
    ) -> Result<bool, CacheError> {
        if self.contains_key(key).await? {
            return Ok(true);
        }
        self.set_expires_at(key, value, expires_at).await
    }

    /// [`add`](Self::add) with a relative expiry on a fresh write.
    pub async fn add_expires_in<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expires_in: Duration,
    ) -> Result<bool, CacheError> {
        if self.contains_key(key).await? {
            return Ok(true);
        }
        self.set_expires_in(key, value, expires_in).await
    }

    /// Delete `key`. Returns whether it existed.
    pub async fn remove(&self, key: &str) -> Result<bool, CacheError> {
        require_key(key)?;
        Ok(self.store.key_delete(key).await?)
    }

    /// Delete many keys, one round trip each.
    pub async fn remove_all(&self, keys: &[&str]) -> Result<(), CacheError> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }

    /// Write `value` only when `key` already exists. Reports success
    /// without writing when the key is absent.
    pub async fn replace<T: Serialize>(&self, key: &str, value: &T) -> Result<bool, CacheError> {
        if !self.contains_key(key).await? {
            return Ok(true);
        }
        self.set(key, value).await
    }

    /// [`replace`](Self::replace) with an absolute expiry on a fresh write.
    pub async fn replace_expires_at<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expires_at: SystemTime,
    ) -> Result<bool, CacheError> {
        if !self.contains_key(key).await? {
            return Ok(true);
        }
        self.set_expires_at(key, value, expires_at).await
    }

    /// [`replace`](Self::replace) with a relative expiry on a fresh write.
    pub async fn replace_expires_in<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expires_in: Duration,
    ) -> Result<bool, CacheError> {
        if !self.contains_key(key).await? {
            return Ok(true);
        }
        self.set_expires_in(key, value, expires_in).await
    }

    /// Atomically add `amount` to the integer at `key`, server-side. An
    /// absent key counts from zero. Returns the new value.
    pub async fn increment(&self, key: &str, amount: i64) -> Result<i64, CacheError> {
        require_key(key)?;
        Ok(self.store.value_incr_by(key, amount).await?)
    }

    /// Atomically subtract `amount` from the integer at `key`, server-side.
    /// Returns the new value.
    pub async fn decrement(&self, key: &str, amount: i64) -> Result<i64, CacheError> {
        require_key(key)?;
        Ok(self.store.value_decr_by(key, amount).await?)
    }
}
