//! Cart route handlers.
//!
//! JSON endpoints over the single `CartStore`. Successful mutations return the
//! updated cart and an `HX-Trigger: cart-updated` header so the client can
//! refresh badges; failures return the shopper notification (see
//! [`crate::error`]).

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{AppendHeaders, IntoResponse, Response},
};
use rocketshoes_core::{Cart, CartEntry, Price, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// Client-side event fired after every successful cart mutation.
pub const CART_UPDATED_TRIGGER: &str = "cart-updated";

/// Cart item display data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemView {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub price: Price,
    pub amount: u32,
    pub line_total: Price,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    pub subtotal: Price,
}

/// Cart count badge data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartCountView {
    pub count: u64,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&CartEntry> for CartItemView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            id: entry.id(),
            title: entry.product.title.clone(),
            image: entry.product.image.clone(),
            price: entry.product.price,
            amount: entry.amount,
            line_total: entry.line_total(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.entries().iter().map(CartItemView::from).collect(),
            item_count: cart.total_quantity(),
            subtotal: cart.subtotal(),
        }
    }
}

// =============================================================================
// Request Bodies
// =============================================================================

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
}

/// Update cart request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    /// Signed so that zero and negative requests reach the store and are
    /// reported as invalid quantities.
    pub amount: i64,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Updated cart plus the client refresh trigger.
fn updated(cart: &Cart) -> Response {
    (
        AppendHeaders([("HX-Trigger", CART_UPDATED_TRIGGER)]),
        Json(CartView::from(cart)),
    )
        .into_response()
}

/// Cart unchanged by the request; no refresh trigger.
fn unchanged(cart: &Cart) -> Response {
    Json(CartView::from(cart)).into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    Json(CartView::from(&state.cart().cart().await))
}

/// Get the cart count badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCountView> {
    let count = state.cart().cart().await.total_quantity();
    Json(CartCountView { count })
}

/// Add one unit of a product.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AddToCartForm>, JsonRejection>,
) -> Result<Response> {
    let Json(form) = payload?;
    let id = form.product_id.to_string();
    add_breadcrumb("cart", "Add product", Some(&[("product_id", id.as_str())]));

    let cart = state.cart().add_product(form.product_id).await?;
    Ok(updated(&cart))
}

/// Set the quantity of a product in the cart.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UpdateCartForm>, JsonRejection>,
) -> Result<Response> {
    let Json(form) = payload?;
    let id = form.product_id.to_string();
    let amount = form.amount.to_string();
    add_breadcrumb(
        "cart",
        "Update quantity",
        Some(&[("product_id", id.as_str()), ("amount", amount.as_str())]),
    );

    let cart = state
        .cart()
        .update_product_amount(form.product_id, form.amount)
        .await?;

    // Updating a product that is not in the cart is a no-op.
    if cart.contains(form.product_id) {
        Ok(updated(&cart))
    } else {
        Ok(unchanged(&cart))
    }
}

/// Remove a product from the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RemoveFromCartForm>, JsonRejection>,
) -> Result<Response> {
    let Json(form) = payload?;
    let id = form.product_id.to_string();
    add_breadcrumb("cart", "Remove product", Some(&[("product_id", id.as_str())]));

    let cart = state.cart().remove_product(form.product_id).await?;
    Ok(updated(&cart))
}
