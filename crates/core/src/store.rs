//! The entity store.
//!
//! The key set is fixed once the store is built (no creation or deletion), so
//! the map itself needs no lock. Each product sits behind its own
//! `RwLock`: reads of one product share it, a mutation excludes every other
//! operation on that product only, and different products never contend.

use std::collections::HashMap;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::types::{Product, ProductKey};

/// Canonical in-memory mapping from key to product.
#[derive(Debug, Default)]
pub struct EntityStore {
    entries: HashMap<ProductKey, RwLock<Product>>,
}

impl EntityStore {
    /// Build a store from products, keyed by each product's `id`.
    ///
    /// A later product with an already-seen id replaces the earlier one.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let entries = products
            .into_iter()
            .map(|product| (product.id.clone(), RwLock::new(product)))
            .collect();
        Self { entries }
    }

    /// Number of stored products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &ProductKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Stored keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&ProductKey> {
        let mut keys: Vec<_> = self.entries.keys().collect();
        keys.sort_unstable();
        keys
    }

    /// Shared access to a product for the duration of the guard.
    #[must_use]
    pub fn read(&self, key: &ProductKey) -> Option<RwLockReadGuard<'_, Product>> {
        self.entries.get(key).map(|lock| lock.read())
    }

    /// A copy of a product's current state.
    #[must_use]
    pub fn snapshot(&self, key: &ProductKey) -> Option<Product> {
        self.read(key).map(|product| product.clone())
    }

    /// Exclusive access to a product; reserved for the mutation executor.
    pub(crate) fn write(&self, key: &ProductKey) -> Option<RwLockWriteGuard<'_, Product>> {
        self.entries.get(key).map(|lock| lock.write())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store() -> EntityStore {
        EntityStore::from_products([
            Product::new(ProductKey::from("42"), 1),
            Product::new(ProductKey::from("7"), 2),
        ])
    }

    #[test]
    fn test_lookup() {
        let store = store();
        assert_eq!(store.len(), 2);
        assert!(store.contains(&ProductKey::from("42")));
        assert_eq!(store.read(&ProductKey::from("7")).unwrap().top_category, 2);
        assert!(store.read(&ProductKey::from("8")).is_none());
        assert!(store.read(&ProductKey::from(42)).is_none());
    }

    #[test]
    fn test_later_duplicate_wins() {
        let store = EntityStore::from_products([
            Product::new(ProductKey::from("42"), 1),
            Product::new(ProductKey::from("42"), 5),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot(&ProductKey::from("42")).unwrap().top_category, 5);
    }

    #[test]
    fn test_readers_share_and_writer_excludes() {
        let store = store();
        let key = ProductKey::from("42");
        let first = store.read(&key).unwrap();
        let second = store.read(&key).unwrap();
        assert_eq!(first.top_category, second.top_category);
        assert!(store.entries.get(&key).unwrap().try_write().is_none());
        drop((first, second));

        let mut guard = store.write(&key).unwrap();
        guard.top_category = 9;
        assert!(store.entries.get(&key).unwrap().try_read().is_none());
        // Other products stay available while one is being written.
        assert!(store.read(&ProductKey::from("7")).is_some());
        drop(guard);
        assert_eq!(store.snapshot(&key).unwrap().top_category, 9);
    }

    #[test]
    fn test_keys_sorted() {
        let store = store();
        assert_eq!(
            store.keys(),
            vec![&ProductKey::from("42"), &ProductKey::from("7")]
        );
    }
}
