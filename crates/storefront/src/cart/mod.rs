//! Shopping cart.
//!
//! # Lifecycle
//!
//! A [`Cart`] restores itself from its [`CartStore`] when constructed and is
//! ready from then on. Every mutation (`add`, `remove`, `clear`) is followed
//! by the same steps:
//!
//! 1. commit: the full entry list is written to the store (or the key is
//!    deleted, for `clear`)
//! 2. totals are recomputed
//! 3. the [`CartObserver`] is notified
//!
//! A failed commit does not roll the mutation back. The error is returned so
//! the caller can report it, and the next successful commit catches up.

mod observer;
mod store;

use std::sync::Arc;

use mercadito_core::{CartEntry, Product, ProductId, Quantity, Totals};
use thiserror::Error;
use tracing::{debug, warn};

pub use observer::{CartObserver, NoopObserver, added_message};
pub use store::{CartStore, FileStore, MemoryStore, StoreError};

/// Store key holding the serialized entry list.
pub const CART_KEY: &str = "cart";

/// Errors returned by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The mutation was applied in memory but could not be persisted.
    #[error("failed to persist cart: {0}")]
    Store(#[from] StoreError),
}

/// What `remove` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// One unit was taken away; this many remain.
    Decremented(Quantity),
    /// The last unit was taken away and the entry dropped.
    Removed,
    /// There was no entry for the id. Nothing changed.
    NotInCart,
}

/// The session cart: entries in insertion order plus derived totals.
pub struct Cart {
    entries: Vec<CartEntry>,
    totals: Totals,
    store: Arc<dyn CartStore>,
    observer: Arc<dyn CartObserver>,
}

impl std::fmt::Debug for Cart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cart")
            .field("entries", &self.entries)
            .field("totals", &self.totals)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl Cart {
    /// Restore the cart from `store` and notify `observer` of its contents.
    ///
    /// A missing value gives an empty cart. So does an unreadable or
    /// malformed one; that case is logged and otherwise ignored.
    pub fn new(store: Arc<dyn CartStore>, observer: Arc<dyn CartObserver>) -> Self {
        let entries = restore(store.as_ref());
        let mut cart = Self {
            totals: Totals::default(),
            entries,
            store,
            observer,
        };
        cart.refresh();
        cart
    }

    /// Restore the cart from `store` without an observer.
    pub fn with_store(store: Arc<dyn CartStore>) -> Self {
        Self::new(store, Arc::new(NoopObserver))
    }

    /// Entries in the order they were first added.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Current totals.
    #[must_use]
    pub const fn totals(&self) -> Totals {
        self.totals
    }

    /// Whether the cart holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Units of `id` in the cart, if any.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> Option<Quantity> {
        self.entries
            .iter()
            .find(|e| e.id() == id)
            .map(|e| e.quantity)
    }

    /// Add one unit of `product` and return the resulting quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] if the new contents could not be
    /// persisted. The unit is still in the cart, but no confirmation is sent.
    pub fn add(&mut self, product: &Product) -> Result<Quantity, CartError> {
        let quantity = if let Some(entry) = self.entries.iter_mut().find(|e| e.id() == product.id)
        {
            entry.quantity = entry.quantity.incremented();
            entry.quantity
        } else {
            self.entries.push(CartEntry::new(product.clone()));
            Quantity::ONE
        };
        debug!(product_id = %product.id, %quantity, "Added to cart");

        let committed = self.commit();
        self.refresh();
        committed?;
        self.observer.product_added(product);
        Ok(quantity)
    }

    /// Take one unit of `id` out of the cart.
    ///
    /// Removing an id that is not in the cart is a no-op: nothing is
    /// persisted and the observer is not notified.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] if the new contents could not be
    /// persisted. The unit is still removed.
    pub fn remove(&mut self, id: ProductId) -> Result<RemoveOutcome, CartError> {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id() == id) else {
            debug!(product_id = %id, "Remove ignored, product not in cart");
            return Ok(RemoveOutcome::NotInCart);
        };

        let outcome = if let Some(quantity) = entry.quantity.decremented() {
            entry.quantity = quantity;
            RemoveOutcome::Decremented(quantity)
        } else {
            self.entries.retain(|e| e.id() != id);
            RemoveOutcome::Removed
        };
        debug!(product_id = %id, ?outcome, "Removed from cart");

        let committed = self.commit();
        self.refresh();
        committed?;
        Ok(outcome)
    }

    /// Empty the cart and delete its persisted value.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] if the persisted value could not be
    /// deleted. The in-memory cart is empty regardless.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.entries.clear();
        let deleted = self.store.delete(CART_KEY);
        self.refresh();
        debug!("Cart cleared");
        deleted?;
        Ok(())
    }

    /// Write the full entry list to the store.
    fn commit(&self) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(&self.entries)?;
        self.store.put(CART_KEY, &serialized).inspect_err(|e| {
            warn!(error = %e, "Failed to persist cart");
        })
    }

    /// Recompute totals and notify the observer.
    fn refresh(&mut self) {
        self.totals = Totals::of(&self.entries);
        self.observer.cart_changed(&self.entries, self.totals);
    }
}

/// Read the persisted entries, falling back to an empty cart.
fn restore(store: &dyn CartStore) -> Vec<CartEntry> {
    let raw = match store.get(CART_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "Failed to read persisted cart, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<CartEntry>>(&raw) {
        Ok(entries) => merge_duplicates(entries),
        Err(e) => {
            warn!(error = %e, "Persisted cart is malformed, starting empty");
            Vec::new()
        }
    }
}

/// Fold repeated ids into their first entry so each id appears once.
fn merge_duplicates(entries: Vec<CartEntry>) -> Vec<CartEntry> {
    let mut merged: Vec<CartEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        if let Some(existing) = merged.iter_mut().find(|e| e.id() == entry.id()) {
            warn!(product_id = %entry.id(), "Duplicate entry in persisted cart, merging");
            existing.quantity = existing.quantity.saturating_add(entry.quantity);
        } else {
            merged.push(entry);
        }
    }
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use mercadito_core::Price;

    use super::*;

    fn mouse() -> Product {
        Product::new(ProductId::new(1), "Mouse", Price::from_units(10), "Tech")
    }

    fn mug() -> Product {
        Product::new(ProductId::new(2), "Mug", Price::from_units(5), "Home")
    }

    fn empty_cart() -> (Cart, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Cart::with_store(store.clone()), store)
    }

    #[derive(Default)]
    struct Recorder {
        changes: Mutex<Vec<Totals>>,
        added: Mutex<Vec<String>>,
    }

    impl CartObserver for Recorder {
        fn cart_changed(&self, _entries: &[CartEntry], totals: Totals) {
            self.changes.lock().unwrap().push(totals);
        }

        fn product_added(&self, product: &Product) {
            self.added.lock().unwrap().push(added_message(product));
        }
    }

    /// Store whose writes always fail.
    #[derive(Debug)]
    struct ReadOnlyStore;

    impl CartStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn put(&self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::InvalidKey(key.to_string()))
        }

        fn delete(&self, key: &str) -> Result<(), StoreError> {
            Err(StoreError::InvalidKey(key.to_string()))
        }
    }

    #[test]
    fn test_new_cart_without_persisted_value_is_empty() {
        let (cart, store) = empty_cart();
        assert!(cart.is_empty());
        assert_eq!(cart.totals(), Totals::default());
        assert_eq!(store.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_add_same_product_aggregates() {
        let (mut cart, _) = empty_cart();
        for expected in 1..=4 {
            let quantity = cart.add(&mouse()).unwrap();
            assert_eq!(quantity.get(), expected);
        }

        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.totals().items, 4);
        assert_eq!(cart.quantity_of(ProductId::new(1)).unwrap().get(), 4);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let (mut cart, _) = empty_cart();
        cart.add(&mug()).unwrap();
        cart.add(&mouse()).unwrap();
        cart.add(&mug()).unwrap();

        let ids: Vec<_> = cart.entries().iter().map(|e| e.id().as_i32()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_add_persists_full_cart() {
        let (mut cart, store) = empty_cart();
        cart.add(&mouse()).unwrap();
        cart.add(&mug()).unwrap();

        let raw = store.get(CART_KEY).unwrap().unwrap();
        let persisted: Vec<CartEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, cart.entries());
    }

    #[test]
    fn test_add_then_remove_restores_prior_state() {
        let (mut cart, _) = empty_cart();
        cart.add(&mug()).unwrap();
        let before_entries = cart.entries().to_vec();
        let before_totals = cart.totals();

        cart.add(&mouse()).unwrap();
        assert_eq!(cart.remove(ProductId::new(1)).unwrap(), RemoveOutcome::Removed);

        assert_eq!(cart.entries(), before_entries.as_slice());
        assert_eq!(cart.totals(), before_totals);
    }

    #[test]
    fn test_add_then_remove_decrements_existing() {
        let (mut cart, _) = empty_cart();
        cart.add(&mouse()).unwrap();
        cart.add(&mouse()).unwrap();

        cart.add(&mouse()).unwrap();
        let outcome = cart.remove(ProductId::new(1)).unwrap();

        assert_eq!(outcome, RemoveOutcome::Decremented(Quantity::new(2).unwrap()));
        assert_eq!(cart.totals().items, 2);
    }

    #[test]
    fn test_mouse_scenario() {
        let (mut cart, _) = empty_cart();
        cart.add(&mouse()).unwrap();
        cart.add(&mouse()).unwrap();
        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.totals().items, 2);
        assert_eq!(cart.totals().price, Price::from_units(20));

        cart.remove(ProductId::new(1)).unwrap();
        assert_eq!(cart.quantity_of(ProductId::new(1)), Some(Quantity::ONE));
        assert_eq!(cart.totals().price, Price::from_units(10));

        cart.remove(ProductId::new(1)).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.totals().items, 0);
        assert_eq!(cart.totals().price, Price::ZERO);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let store = Arc::new(MemoryStore::new());
        let recorder = Arc::new(Recorder::default());
        let mut cart = Cart::new(store.clone(), recorder.clone());
        cart.add(&mug()).unwrap();
        let persisted = store.get(CART_KEY).unwrap();
        let notifications = recorder.changes.lock().unwrap().len();

        let outcome = cart.remove(ProductId::new(99)).unwrap();

        assert_eq!(outcome, RemoveOutcome::NotInCart);
        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.totals().items, 1);
        assert_eq!(store.get(CART_KEY).unwrap(), persisted);
        assert_eq!(recorder.changes.lock().unwrap().len(), notifications);
    }

    #[test]
    fn test_remove_on_empty_cart_is_noop() {
        let (mut cart, store) = empty_cart();
        assert_eq!(cart.remove(ProductId::new(1)).unwrap(), RemoveOutcome::NotInCart);
        assert_eq!(store.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_clear_deletes_persisted_value() {
        let (mut cart, store) = empty_cart();
        cart.add(&mouse()).unwrap();
        cart.add(&mug()).unwrap();

        cart.clear().unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.totals().items, 0);
        assert_eq!(cart.totals().price, Price::ZERO);
        assert_eq!(store.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_restore_from_persisted_value() {
        let raw = r#"[{"id":2,"name":"Mug","price":5,"category":"Home","image":false,"quantity":3}]"#;
        let cart = Cart::with_store(Arc::new(MemoryStore::with_value(CART_KEY, raw)));

        assert_eq!(cart.totals().items, 3);
        assert_eq!(cart.totals().price, Price::from_units(15));
    }

    #[test]
    fn test_restore_malformed_value_starts_empty() {
        for raw in ["not json", "null", r#"{"id":1}"#, r#"[{"id":1,"quantity":0}]"#] {
            let cart = Cart::with_store(Arc::new(MemoryStore::with_value(CART_KEY, raw)));
            assert!(cart.is_empty(), "expected empty cart for {raw}");
            assert_eq!(cart.totals(), Totals::default());
        }
    }

    #[test]
    fn test_restore_merges_duplicate_ids() {
        let raw = r#"[
            {"id":2,"name":"Mug","price":5,"category":"Home","quantity":1},
            {"id":1,"name":"Mouse","price":10,"category":"Tech","quantity":1},
            {"id":2,"name":"Mug","price":5,"category":"Home","quantity":2}
        ]"#;
        let cart = Cart::with_store(Arc::new(MemoryStore::with_value(CART_KEY, raw)));

        assert_eq!(cart.entries().len(), 2);
        assert_eq!(cart.quantity_of(ProductId::new(2)).unwrap().get(), 3);
        assert_eq!(cart.entries()[0].id(), ProductId::new(2));
    }

    #[test]
    fn test_observer_notifications() {
        let recorder = Arc::new(Recorder::default());
        let mut cart = Cart::new(Arc::new(MemoryStore::new()), recorder.clone());

        cart.add(&mouse()).unwrap();
        cart.remove(ProductId::new(1)).unwrap();
        cart.clear().unwrap();

        // initialize, add, remove, clear
        let changes = recorder.changes.lock().unwrap();
        assert_eq!(changes.len(), 4);
        assert_eq!(changes[1].items, 1);
        assert_eq!(
            *recorder.added.lock().unwrap(),
            vec!["Mouse was added to the cart".to_string()]
        );
    }

    #[test]
    fn test_commit_failure_keeps_mutation() {
        let recorder = Arc::new(Recorder::default());
        let mut cart = Cart::new(Arc::new(ReadOnlyStore), recorder.clone());

        let err = cart.add(&mouse()).unwrap_err();
        assert!(matches!(err, CartError::Store(_)));
        assert_eq!(cart.totals().items, 1);
        assert!(recorder.added.lock().unwrap().is_empty());

        assert!(cart.clear().is_err());
        assert!(cart.is_empty());
    }
}
