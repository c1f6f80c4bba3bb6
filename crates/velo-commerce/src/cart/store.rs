//! Persisted cart.
//!
//! [`CartStore`] owns the current [`Cart`] snapshot and writes every change
//! through to a [`KvStore`]. Storage failures never fail a cart operation:
//! they are logged and the in-memory cart stays authoritative.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use velo_cache::{Cache, KvStore};

use crate::cart::{Cart, CartLine, LineCandidate, QuantityChange, Variation};
use crate::error::CommerceError;
use crate::ids::{LineId, ProductId};

/// Default storage key for the cart record.
pub const DEFAULT_CART_KEY: &str = "velo:cart";

/// Cart persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartSettings {
    /// Key under which the cart record is stored.
    pub storage_key: String,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_CART_KEY.to_string(),
        }
    }
}

/// The live cart plus its persistence.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use velo_cache::MemoryStore;
/// use velo_commerce::cart::CartStore;
/// use velo_commerce::catalog::{Product, ProductKind};
/// use velo_commerce::cart::Variation;
/// use velo_commerce::money::Money;
///
/// let mut store = CartStore::new(Arc::new(MemoryStore::new()));
/// let chain = Product::new(7, "11-speed Chain", ProductKind::Hardware, Money::from_cents(3499), 3);
///
/// let change = store.add_item(chain.candidate(Variation::none(), 5));
/// assert!(change.was_clamped());
/// assert_eq!(store.cart().grand_quantity(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct CartStore {
    cart: Cart,
    cache: Cache,
    key: String,
}

impl CartStore {
    /// Create an empty cart backed by `store` under the default key.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            cart: Cart::new(),
            cache: Cache::new(store),
            key: DEFAULT_CART_KEY.to_string(),
        }
    }

    /// Use a different storage key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Apply persistence settings.
    pub fn with_settings(self, settings: &CartSettings) -> Self {
        self.with_key(settings.storage_key.clone())
    }

    /// Restore the cart from storage.
    ///
    /// Missing, unreadable or malformed records yield an empty cart. A record
    /// that decodes is normalised on the way in.
    pub fn rehydrate(mut self) -> Self {
        self.cart = match self.cache.get::<Cart>(&self.key) {
            Ok(Some(cart)) => {
                debug!(key = %self.key, lines = cart.unique_line_count(), "Cart restored");
                cart
            }
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding unreadable cart record");
                Cart::new()
            }
        };
        self
    }

    /// Restore the cart from storage, reporting storage and decode errors.
    pub fn load(mut self) -> Result<Self, CommerceError> {
        self.cart = self.cache.get::<Cart>(&self.key)?.unwrap_or_default();
        Ok(self)
    }

    /// The current snapshot.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// An owned copy of the current snapshot.
    pub fn snapshot(&self) -> Cart {
        self.cart.clone()
    }

    /// Storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Add a candidate to the cart. See [`Cart::add_item`].
    pub fn add_item(&mut self, candidate: LineCandidate) -> QuantityChange {
        let (next, change) = self.cart.add_item(candidate);
        if change.was_clamped() {
            debug!(
                line = %change.line_id,
                requested = change.requested,
                applied = change.applied,
                "Quantity clamped to stock"
            );
        }
        if !change.is_noop() {
            self.commit(next);
        }
        change
    }

    /// Remove a line. Returns `true` if a line was removed.
    pub fn remove_item(&mut self, line_id: &LineId) -> bool {
        if self.cart.line(line_id).is_none() {
            return false;
        }
        let next = self.cart.remove_item(line_id);
        self.commit(next);
        true
    }

    /// Set a line's quantity. `None` if no such line exists.
    pub fn update_quantity(&mut self, line_id: &LineId, quantity: i64) -> Option<QuantityChange> {
        let (next, change) = self.cart.update_quantity(line_id, quantity);
        let change = change?;
        if !change.is_noop() {
            self.commit(next);
        }
        Some(change)
    }

    /// Empty the cart and drop its stored record.
    pub fn clear(&mut self) {
        let next = self.cart.cleared();
        self.commit(next);
    }

    /// Look up the line for a product and variation.
    pub fn find_line(&self, product_id: ProductId, variation: &Variation) -> Option<&CartLine> {
        self.cart.find_line(product_id, variation)
    }

    fn commit(&mut self, next: Cart) {
        self.cart = next;
        debug!(
            key = %self.key,
            lines = self.cart.unique_line_count(),
            quantity = self.cart.grand_quantity(),
            "Cart updated"
        );

        let result = if self.cart.is_empty() {
            self.cache.delete(&self.key)
        } else {
            self.cache.set(&self.key, &self.cart)
        };
        if let Err(e) = result {
            warn!(key = %self.key, error = %e, "Failed to persist cart");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Product, ProductKind};
    use crate::money::Money;
    use velo_cache::{CacheError, MemoryStore};

    struct FailingStore;

    impl KvStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            Err(CacheError::StoreError("unavailable".into()))
        }

        fn set(&self, _key: &str, _value: &[u8]) -> Result<(), CacheError> {
            Err(CacheError::StoreError("unavailable".into()))
        }

        fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::StoreError("unavailable".into()))
        }

        fn keys(&self) -> Result<Vec<String>, CacheError> {
            Err(CacheError::StoreError("unavailable".into()))
        }
    }

    fn jersey() -> Product {
        Product::new(3, "Team Jersey", ProductKind::Apparel, Money::from_cents(5995), 4)
            .with_colors(["Navy", "White"])
            .with_sizes(["S", "M", "L"])
    }

    fn navy_m() -> Variation {
        Variation::none().with_color("Navy").with_size("M")
    }

    #[test]
    fn test_write_through() {
        let kv = Arc::new(MemoryStore::new());
        let mut store = CartStore::new(kv.clone());
        store.add_item(jersey().candidate(navy_m(), 2));

        let restored = CartStore::new(kv).rehydrate();
        assert_eq!(restored.cart(), store.cart());
        assert_eq!(restored.cart().grand_quantity(), 2);
    }

    #[test]
    fn test_empty_cart_deletes_record() {
        let kv = Arc::new(MemoryStore::new());
        let mut store = CartStore::new(kv.clone());
        let change = store.add_item(jersey().candidate(navy_m(), 1));
        assert!(kv.exists(DEFAULT_CART_KEY).unwrap());

        assert!(store.remove_item(&change.line_id));
        assert!(!kv.exists(DEFAULT_CART_KEY).unwrap());
    }

    #[test]
    fn test_clear_deletes_record() {
        let kv = Arc::new(MemoryStore::new());
        let mut store = CartStore::new(kv.clone());
        store.add_item(jersey().candidate(navy_m(), 1));
        store.clear();
        assert!(store.cart().is_empty());
        assert!(kv.is_empty());
    }

    #[test]
    fn test_malformed_record_rehydrates_empty() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(DEFAULT_CART_KEY, b"{not json").unwrap();

        let store = CartStore::new(kv.clone()).rehydrate();
        assert!(store.cart().is_empty());

        let strict = CartStore::new(kv).load();
        assert!(matches!(strict, Err(CommerceError::Storage(_))));
    }

    #[test]
    fn test_rehydrate_normalises_record() {
        let kv = Arc::new(MemoryStore::new());
        let record = serde_json::json!({
            "lines": [{
                "lineId": "stale",
                "productId": 3,
                "name": "Team Jersey",
                "unitPrice": "59.95",
                "quantity": 9,
                "color": "Navy",
                "size": "M",
                "productKind": "apparel",
                "availableStock": 4
            }],
            "grandQuantity": 100,
            "subtotal": "1.00"
        });
        kv.set(DEFAULT_CART_KEY, record.to_string().as_bytes()).unwrap();

        let store = CartStore::new(kv).rehydrate();
        let line = store.find_line(ProductId::new(3), &navy_m()).unwrap();
        assert_eq!(line.line_id.as_str(), "3|c=Navy|s=M");
        assert_eq!(line.quantity, 4);
        assert_eq!(store.cart().grand_quantity(), 4);
        assert_eq!(store.cart().subtotal(), Money::from_cents(23980));
    }

    #[test]
    fn test_storage_failure_is_not_fatal() {
        let mut store = CartStore::new(Arc::new(FailingStore)).rehydrate();
        let change = store.add_item(jersey().candidate(navy_m(), 2));
        assert_eq!(change.applied, 2);
        assert_eq!(store.cart().grand_quantity(), 2);
        store.clear();
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_update_unknown_line() {
        let mut store = CartStore::new(Arc::new(MemoryStore::new()));
        assert!(store.update_quantity(&LineId::new("nope"), 3).is_none());
        assert!(!store.remove_item(&LineId::new("nope")));
    }

    #[test]
    fn test_custom_key() {
        let kv = Arc::new(MemoryStore::new());
        let settings = CartSettings {
            storage_key: "shop:cart".into(),
        };
        let mut store = CartStore::new(kv.clone()).with_settings(&settings);
        store.add_item(jersey().candidate(navy_m(), 1));
        assert_eq!(kv.keys().unwrap(), vec!["shop:cart".to_string()]);
    }
}
