//! Mercadito Core - Shared types library.
//!
//! This crate provides the types shared by all Mercadito components:
//! - `storefront` - Catalog, cart and the server-rendered shop
//! - `cli` - Command-line front end over the same catalog and cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices and quantities, plus the
//!   product and cart entry records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
