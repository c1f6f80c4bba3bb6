//! Key-value store abstraction with automatic serialization.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::CacheError;

/// A raw byte-oriented key-value store.
///
/// Implementations must be safe to share between threads; the cart store and
/// the CLI hold them behind an `Arc`.
pub trait KvStore: Send + Sync {
    /// Read the bytes stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Remove `key`. Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Check whether `key` is present.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }

    /// List every key in the store.
    fn keys(&self) -> Result<Vec<String>, CacheError>;
}

/// Type-safe cache over any [`KvStore`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KvStore>,
}

impl Cache {
    /// Wrap a store.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use velo_cache::{Cache, MemoryStore};
    ///
    /// let cache = Cache::new(Arc::new(MemoryStore::new()));
    /// cache.set("greeting", &"hola").unwrap();
    /// let value: Option<String> = cache.get("greeting").unwrap();
    /// assert_eq!(value.as_deref(), Some("hola"));
    /// ```
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key)? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.set(key, &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store.keys()
    }

    /// Access the underlying store.
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// use velo_cache::cache_key;
///
/// let key = cache_key!("velo", "cart", 42);
/// assert_eq!(key, "velo:cart:42");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Basket {
        items: Vec<String>,
    }

    #[test]
    fn test_typed_round_trip() {
        let cache = Cache::new(Arc::new(MemoryStore::new()));
        let basket = Basket {
            items: vec!["crankset".into(), "jersey".into()],
        };

        cache.set("basket", &basket).unwrap();
        assert!(cache.exists("basket").unwrap());
        assert_eq!(cache.get::<Basket>("basket").unwrap(), Some(basket));
    }

    #[test]
    fn test_get_missing_is_none() {
        let cache = Cache::new(Arc::new(MemoryStore::new()));
        assert_eq!(cache.get::<Basket>("nothing").unwrap(), None);
    }

    #[test]
    fn test_get_wrong_shape_is_error() {
        let store = Arc::new(MemoryStore::new());
        store.set("basket", b"{\"not\":\"a basket\"}").unwrap();
        let cache = Cache::new(store);
        assert!(matches!(
            cache.get::<Basket>("basket"),
            Err(CacheError::SerializeError(_))
        ));
    }

    #[test]
    fn test_cache_key_macro() {
        assert_eq!(cache_key!("velo", "cart"), "velo:cart");
        assert_eq!(cache_key!("velo", "cart", 7), "velo:cart:7");
    }
}
