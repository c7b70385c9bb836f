//! RocketShoes Storefront library.
//!
//! This crate provides the cart store and its collaborators as a library, so
//! the server binary, the CLI, and the integration tests all drive the same
//! code.
//!
//! # Modules
//!
//! - [`services::cart`] - `CartStore`: add/remove/update with stock checks
//! - [`inventory`] - Inventory API client (products, stock)
//! - [`storage`] - Key-value persistence for the cart
//! - [`notify`] - Shopper-facing failure notifications
//! - [`routes`] - JSON HTTP surface

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod inventory;
pub mod middleware;
pub mod notify;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
