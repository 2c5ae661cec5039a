//! Hooks run after the cart changes.

use mercadito_core::{CartEntry, Product, Totals};

/// Receives cart notifications once a mutation has been applied.
///
/// Both methods default to doing nothing.
pub trait CartObserver: Send + Sync {
    /// The contents or totals changed; redraw anything showing the cart.
    fn cart_changed(&self, entries: &[CartEntry], totals: Totals) {
        let _ = (entries, totals);
    }

    /// A unit of `product` was added; show a short confirmation.
    fn product_added(&self, product: &Product) {
        let _ = product;
    }
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CartObserver for NoopObserver {}

/// Confirmation text shown after adding `product`.
#[must_use]
pub fn added_message(product: &Product) -> String {
    format!("{} was added to the cart", product.name)
}
