//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - The shopper's cart: mutations, stock validation, persistence

pub mod cart;

pub use cart::{CartError, CartStore};
