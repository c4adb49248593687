//! Key-value persistence behind the write-through stores.
//!
//! A [`KeyValueStore`] maps string keys to serialized JSON strings, the same
//! contract as browser local storage. The storefront backs it with the
//! visitor's session; tests use [`MemoryStore`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

/// Storage key for the cart collection.
pub const CART_KEY: &str = "cart";

/// Storage key for the checkout draft.
pub const CHECKOUT_DRAFT_KEY: &str = "checkoutFormData";

/// Storage key for per-visitor UI state.
pub const VISITOR_STATE_KEY: &str = "visitorState";

/// Errors from a persistence backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The value could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backend refused the write because it is full.
    #[error("storage quota exceeded ({needed} bytes needed, {limit} allowed)")]
    QuotaExceeded {
        /// Bytes the store would hold after the write.
        needed: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// String key-value persistence.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Overwrite the value stored under `key`.
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// In-process store, cheaply cloneable; clones share the same map.
///
/// An optional byte quota makes writes fail the way a full browser storage
/// area does.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once keys and values exceed `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            inner: Arc::default(),
            quota: Some(bytes),
        }
    }

    /// Read a value without going through the async trait.
    #[must_use]
    pub fn snapshot(&self, key: &str) -> Option<String> {
        self.lock().ok().and_then(|map| map.get(key).cloned())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.inner
            .lock()
            .map_err(|_| StorageError::Backend("memory store lock poisoned".to_string()))
    }

    fn set_sync(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut map = self.lock()?;
        if let Some(limit) = self.quota {
            let others: usize = map
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }
        map.insert(key.to_owned(), value);
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.set_sync(key, value)
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.remove("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let clone = store.clone();
        clone.set("k", "v".to_string()).await.unwrap();
        assert_eq!(store.snapshot("k").as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_quota_exceeded() {
        let store = MemoryStore::with_quota(8);
        store.set("k", "1234".to_string()).await.unwrap();
        let err = store.set("k", "123456789".to_string()).await.unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { limit: 8, .. }));
        // The failed write left the old value in place.
        assert_eq!(store.snapshot("k").as_deref(), Some("1234"));
    }
}
