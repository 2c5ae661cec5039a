//! Core types for Mercadito.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{CartEntry, Quantity, QuantityError, Totals};
pub use id::*;
pub use price::Price;
pub use product::Product;
