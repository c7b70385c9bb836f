//! Inventory API client.
//!
//! # Architecture
//!
//! - The inventory backend is the source of truth for product details and
//!   stock levels - the cart never writes to it
//! - [`InventoryApi`] is the seam the cart store depends on, so tests and
//!   alternative backends can stand in for HTTP
//! - [`HttpInventoryApi`] talks JSON over `reqwest` and caches product details
//!   in memory via `moka`; stock is always fetched fresh
//!
//! # Endpoints
//!
//! ```text
//! GET /products/{id}  -> Product
//! GET /stock/{id}     -> Stock
//! ```

mod client;

pub use client::HttpInventoryApi;

use async_trait::async_trait;
use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

/// Errors that can occur when talking to the inventory API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-success status other than 404.
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Read access to product details and stock levels.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// Fetch product details.
    ///
    /// A product the backend does not know is `ApiError::NotFound`.
    async fn product(&self, id: ProductId) -> Result<Product, ApiError>;

    /// Fetch the current stock record.
    ///
    /// `Ok(None)` means the backend has no stock record for this product.
    async fn stock(&self, id: ProductId) -> Result<Option<Stock>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product 12".to_string());
        assert_eq!(err.to_string(), "Not found: product 12");

        let err = ApiError::Status {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "Unexpected status 503: maintenance");
    }
}
