//! Integration tests for the persistent cart.
//!
//! These tests run the cart against a real `FileStore` in a temporary
//! directory, so every "session" starts from what the previous one wrote.

use std::sync::Arc;

use mercadito_core::{Price, ProductId, Quantity};
use mercadito_integration_tests::{mouse, mug};
use mercadito_storefront::cart::{CART_KEY, Cart, CartStore, FileStore, RemoveOutcome};
use mercadito_storefront::checkout::{self, DialogIcon};

fn session(dir: &tempfile::TempDir) -> Cart {
    Cart::with_store(Arc::new(FileStore::new(dir.path())))
}

// =============================================================================
// Mutation Tests
// =============================================================================

#[test]
fn test_add_twice_then_remove_twice() {
    let dir = tempfile::tempdir().unwrap();
    let mut cart = session(&dir);

    cart.add(&mouse()).unwrap();
    cart.add(&mouse()).unwrap();
    assert_eq!(cart.entries().len(), 1);
    assert_eq!(cart.quantity_of(ProductId::new(1)).map(Quantity::get), Some(2));
    assert_eq!(cart.totals().items, 2);
    assert_eq!(cart.totals().price, Price::from_units(20));

    let outcome = cart.remove(ProductId::new(1)).unwrap();
    assert!(matches!(outcome, RemoveOutcome::Decremented(q) if q == Quantity::ONE));
    assert_eq!(cart.totals().price, Price::from_units(10));

    assert_eq!(cart.remove(ProductId::new(1)).unwrap(), RemoveOutcome::Removed);
    assert!(cart.is_empty());
    assert_eq!(cart.totals().items, 0);
    assert_eq!(cart.totals().price, Price::ZERO);
}

#[test]
fn test_entries_keep_first_added_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut cart = session(&dir);

    cart.add(&mug()).unwrap();
    cart.add(&mouse()).unwrap();
    cart.add(&mug()).unwrap();

    let ids: Vec<i32> = cart.entries().iter().map(|e| e.id().as_i32()).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[test]
fn test_remove_unknown_product_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut cart = session(&dir);
    cart.add(&mug()).unwrap();
    let before = cart.entries().to_vec();

    assert_eq!(cart.remove(ProductId::new(99)).unwrap(), RemoveOutcome::NotInCart);
    assert_eq!(cart.entries(), before.as_slice());
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut cart = session(&dir);
        for _ in 0..3 {
            cart.add(&mug()).unwrap();
        }
    }

    let cart = session(&dir);
    assert_eq!(cart.totals().items, 3);
    assert_eq!(cart.totals().price, Price::from_units(15));
    assert_eq!(cart.entries()[0].product, mug());
}

#[test]
fn test_restore_from_previous_session_value() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    store
        .put(
            CART_KEY,
            r#"[{"id":2,"name":"Mug","price":5,"category":"Home","image":"mug.jpg","quantity":3}]"#,
        )
        .unwrap();

    let cart = session(&dir);
    assert_eq!(cart.totals().items, 3);
    assert_eq!(cart.totals().price, Price::from_units(15));
}

#[test]
fn test_persisted_value_is_flat_entry_list() {
    let dir = tempfile::tempdir().unwrap();
    let mut cart = session(&dir);
    cart.add(&mouse()).unwrap();

    let raw = FileStore::new(dir.path()).get(CART_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["id"], 1);
    assert_eq!(value[0]["name"], "Mouse");
    assert_eq!(value[0]["quantity"], 1);
}

#[test]
fn test_corrupt_persisted_value_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    FileStore::new(dir.path()).put(CART_KEY, "not json").unwrap();

    let mut cart = session(&dir);
    assert!(cart.is_empty());

    // The next mutation overwrites the corrupt value.
    cart.add(&mouse()).unwrap();
    assert_eq!(session(&dir).totals().items, 1);
}

// =============================================================================
// Checkout Tests
// =============================================================================

#[test]
fn test_checkout_clears_persisted_cart() {
    let dir = tempfile::tempdir().unwrap();
    let mut cart = session(&dir);
    cart.add(&mouse()).unwrap();
    cart.add(&mug()).unwrap();

    let receipt = checkout::checkout(&mut cart).unwrap().unwrap();
    assert_eq!(receipt.dialog.icon, DialogIcon::Success);
    assert_eq!(receipt.totals.items, 2);
    assert_eq!(receipt.totals.price, Price::from_units(15));

    assert!(cart.is_empty());
    assert!(session(&dir).is_empty());
    assert_eq!(FileStore::new(dir.path()).get(CART_KEY).unwrap(), None);
}

#[test]
fn test_checkout_of_empty_cart() {
    let dir = tempfile::tempdir().unwrap();
    let mut cart = session(&dir);

    assert!(checkout::checkout(&mut cart).unwrap().is_none());
}
