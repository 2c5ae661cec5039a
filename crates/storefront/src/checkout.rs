//! Checkout: acknowledge the order and empty the cart.
//!
//! There is no payment step. Checking out shows a confirmation dialog and
//! clears the cart, including its persisted value.

use mercadito_core::Totals;
use tracing::info;

use crate::cart::{Cart, CartError};

/// Icon shown in a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogIcon {
    Success,
}

impl DialogIcon {
    /// Lowercase name, used as a CSS class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
        }
    }
}

/// A modal acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub text: String,
    pub icon: DialogIcon,
    pub confirm_label: String,
}

impl Dialog {
    /// The dialog shown after a completed purchase.
    #[must_use]
    pub fn order_placed() -> Self {
        Self {
            title: "Your order is on its way".to_string(),
            text: "Your purchase was completed successfully!".to_string(),
            icon: DialogIcon::Success,
            confirm_label: "OK".to_string(),
        }
    }
}

/// Result of a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Dialog to show the shopper.
    pub dialog: Dialog,
    /// Totals of the cart at the moment of checkout.
    pub totals: Totals,
}

/// Check out the cart.
///
/// Returns `Ok(None)` without touching anything when the cart is empty.
///
/// # Errors
///
/// Returns [`CartError`] if the persisted cart could not be deleted. The
/// in-memory cart is empty in that case too.
pub fn checkout(cart: &mut Cart) -> Result<Option<Receipt>, CartError> {
    if cart.is_empty() {
        return Ok(None);
    }

    let totals = cart.totals();
    cart.clear()?;
    info!(items = totals.items, total = %totals.price, "Order placed");

    Ok(Some(Receipt {
        dialog: Dialog::order_placed(),
        totals,
    }))
}
