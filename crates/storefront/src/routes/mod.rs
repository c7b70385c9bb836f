//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check (registered in main)
//!
//! # Cart (JSON)
//! GET  /cart                   - Cart view
//! GET  /cart/count             - Cart count badge
//! POST /cart/add               - Add one unit   {product_id}
//! POST /cart/update            - Set quantity   {product_id, amount}
//! POST /cart/remove            - Remove product {product_id}
//! ```

pub mod cart;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/cart", cart_routes())
}
