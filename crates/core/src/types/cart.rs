//! Cart entry and aggregate types.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// Errors that can occur when building a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Cart quantities start at one.
    #[error("quantity must be at least 1")]
    Zero,
}

/// Number of units of one product in the cart. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] for zero.
    pub const fn new(count: u32) -> Result<Self, QuantityError> {
        match NonZeroU32::new(count) {
            Some(count) => Ok(Self(count)),
            None => Err(QuantityError::Zero),
        }
    }

    /// The unit count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// One more unit, saturating at `u32::MAX`.
    #[must_use]
    pub const fn incremented(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// One fewer unit, or `None` when this was the last one.
    #[must_use]
    pub const fn decremented(self) -> Option<Self> {
        match NonZeroU32::new(self.0.get() - 1) {
            Some(count) => Some(Self(count)),
            None => None,
        }
    }

    /// Sum of two quantities, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0.get()))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A product in the cart together with how many units were added.
///
/// Serialized with the product fields flattened next to `quantity`, so a
/// persisted cart reads as a list of products that each carry a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Copy of the product taken when it was first added.
    #[serde(flatten)]
    pub product: Product,
    /// Units in the cart.
    pub quantity: Quantity,
}

impl CartEntry {
    /// A new entry holding a single unit of `product`.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            product,
            quantity: Quantity::ONE,
        }
    }

    /// Id of the product in this entry.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.product.price.times(self.quantity.get())
    }
}

/// Aggregates derived from the cart contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    /// Sum of all quantities.
    pub items: u64,
    /// Sum of price times quantity over all entries.
    pub price: Price,
}

impl Totals {
    /// Compute totals for a list of entries.
    #[must_use]
    pub fn of(entries: &[CartEntry]) -> Self {
        Self {
            items: entries.iter().map(|e| u64::from(e.quantity.get())).sum(),
            price: entries.iter().map(CartEntry::line_price).sum(),
        }
    }

    /// Whether the cart these totals describe is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items == 0
    }
}
