//! RocketShoes Core - Shared cart and catalog types.
//!
//! This crate provides the types used across all RocketShoes components:
//! - `storefront` - Cart store, inventory client, and HTTP surface
//! - `cli` - Command-line front end for the same cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure cart transformations - no I/O,
//! no storage access, no HTTP clients. Every mutation on [`Cart`] returns a new
//! snapshot so callers decide when (and whether) to commit it.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, products, stock records, and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
