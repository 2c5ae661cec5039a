//! Mercadito Storefront library.
//!
//! This crate provides the catalog, the cart and the server-rendered shop
//! as a library, allowing them to be tested and reused by the CLI.
//!
//! # Modules
//!
//! - [`catalog`] - Product list, its sources and queries
//! - [`cart`] - Session cart, its stores and observers
//! - [`checkout`] - Order confirmation
//! - [`routes`] - Axum handlers and the application router

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod notify;
pub mod routes;
pub mod state;
