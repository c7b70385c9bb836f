//! HTTP implementation of [`InventoryApi`].
//!
//! Uses `reqwest` for JSON requests. Product details are cached with `moka`
//! (TTL from configuration); stock levels are never cached because every
//! quantity change must be checked against the live count.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::StatusCode;
use rocketshoes_core::{Product, ProductId, Stock};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, InventoryApi};
use crate::config::InventoryConfig;

/// Maximum number of product details kept in memory.
const PRODUCT_CACHE_CAPACITY: u64 = 1000;

/// How much of an error body is kept for logs and errors.
const ERROR_BODY_PREVIEW: usize = 200;

/// Client for the inventory JSON API.
#[derive(Clone)]
pub struct HttpInventoryApi {
    inner: Arc<HttpInventoryApiInner>,
}

struct HttpInventoryApiInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<ProductId, Product>,
}

impl HttpInventoryApi {
    /// Create a new inventory API client.
    #[must_use]
    pub fn new(config: &InventoryConfig) -> Self {
        let products = Cache::builder()
            .max_capacity(PRODUCT_CACHE_CAPACITY)
            .time_to_live(config.product_cache_ttl)
            .build();

        Self {
            inner: Arc::new(HttpInventoryApiInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                products,
            }),
        }
    }

    /// GET a JSON resource relative to the base URL.
    ///
    /// Returns `Ok(None)` on 404 so callers decide what "missing" means.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        let url = self.inner.base_url.join(path)?;

        let response = self
            .inner
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(path, "Inventory API returned 404");
            return Ok(None);
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let preview = body.chars().take(ERROR_BODY_PREVIEW).collect::<String>();
            tracing::error!(
                status = %status,
                body = %preview,
                "Inventory API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: preview,
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(ERROR_BODY_PREVIEW).collect::<String>(),
                    "Failed to parse inventory API response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }
}

#[async_trait]
impl InventoryApi for HttpInventoryApi {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        if let Some(product) = self.inner.products.get(&id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self
            .get_json(&format!("products/{id}"))
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("product {id}")))?;

        if product.id != id {
            tracing::warn!(returned = %product.id, "Inventory API returned a different product");
            return Err(ApiError::NotFound(format!("product {id}")));
        }

        self.inner.products.insert(id, product.clone()).await;

        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<Option<Stock>, ApiError> {
        let stock: Option<Stock> = self.get_json(&format!("stock/{id}")).await?;

        // A record for another product tells us nothing about this one.
        Ok(stock.filter(|s| s.id == id))
    }
}
