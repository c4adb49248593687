//! Write-through persistence of a single serializable value.
//!
//! [`Persisted`] reads its key once when opened and rewrites it after every
//! mutation. The in-memory value is authoritative: a failed write is logged
//! and remembered, never propagated, so callers keep working with the state
//! they just produced.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::storage::{KeyValueStore, StorageError};

/// A value mirrored to one key of a [`KeyValueStore`].
#[derive(Debug)]
pub struct Persisted<S, T> {
    storage: S,
    key: &'static str,
    value: T,
    last_error: Option<StorageError>,
}

impl<S, T> Persisted<S, T>
where
    S: KeyValueStore,
    T: Serialize + DeserializeOwned + Default,
{
    /// Hydrate from `storage[key]`.
    ///
    /// A missing key gives `T::default()`. An unreadable or corrupt value
    /// also gives the default, with a warning; the bad value is left in
    /// storage until the next write replaces it.
    pub async fn open(storage: S, key: &'static str) -> Self {
        let value = match storage.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key, error = %e, "Discarding corrupt persisted value");
                    T::default()
                }
            },
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read persisted value");
                T::default()
            }
        };

        Self {
            storage,
            key,
            value,
            last_error: None,
        }
    }

    /// Current in-memory value.
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// Apply `f` to the value, then write the result through.
    pub async fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut self.value);
        self.flush().await;
        result
    }

    /// Reset to the default value and delete the key.
    pub async fn reset(&mut self) {
        self.value = T::default();
        let result = self.storage.remove(self.key).await;
        self.record(result);
    }

    /// The error from the most recent write, if it failed.
    pub const fn last_error(&self) -> Option<&StorageError> {
        self.last_error.as_ref()
    }

    /// Give back the storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    async fn flush(&mut self) {
        let result = match serde_json::to_string(&self.value) {
            Ok(raw) => self.storage.set(self.key, raw).await,
            Err(e) => Err(StorageError::from(e)),
        };
        self.record(result);
    }

    fn record(&mut self, result: Result<(), StorageError>) {
        match result {
            Ok(()) => self.last_error = None,
            Err(e) => {
                tracing::warn!(
                    key = self.key,
                    error = %e,
                    "Persisting failed; keeping in-memory state"
                );
                self.last_error = Some(e);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_missing_key_is_default() {
        let persisted: Persisted<_, Vec<u32>> = Persisted::open(MemoryStore::new(), "k").await;
        assert!(persisted.get().is_empty());
    }

    #[tokio::test]
    async fn test_update_writes_through() {
        let store = MemoryStore::new();
        let mut persisted: Persisted<_, Vec<u32>> = Persisted::open(store.clone(), "k").await;
        persisted.update(|v| v.push(7)).await;
        assert_eq!(store.snapshot("k").as_deref(), Some("[7]"));
    }

    #[tokio::test]
    async fn test_corrupt_value_is_default() {
        let store = MemoryStore::new();
        store.set("k", "{not json".to_string()).await.unwrap();
        let persisted: Persisted<_, Vec<u32>> = Persisted::open(store, "k").await;
        assert!(persisted.get().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_memory() {
        let store = MemoryStore::with_quota(4);
        let mut persisted: Persisted<_, Vec<u32>> = Persisted::open(store.clone(), "k").await;
        persisted.update(|v| v.extend([1, 2, 3, 4, 5])).await;

        assert_eq!(persisted.get(), &vec![1, 2, 3, 4, 5]);
        assert!(matches!(
            persisted.last_error(),
            Some(StorageError::QuotaExceeded { .. })
        ));
        assert_eq!(store.snapshot("k"), None);
    }

    #[tokio::test]
    async fn test_reset_removes_key() {
        let store = MemoryStore::new();
        let mut persisted: Persisted<_, Vec<u32>> = Persisted::open(store.clone(), "k").await;
        persisted.update(|v| v.push(1)).await;
        persisted.reset().await;
        assert!(persisted.get().is_empty());
        assert_eq!(store.snapshot("k"), None);
    }
}
