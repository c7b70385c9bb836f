//! Integration tests for RocketShoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! Each test gets its own [`TestContext`]: a mock inventory API, a temporary
//! storage directory, and a storefront server on an ephemeral port wired
//! exactly like the production binary (HTTP inventory client, file storage,
//! log notifications). Nothing outside the test process is needed.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum::{Router, middleware, routing::get};
use reqwest::Response;
use rocketshoes_storefront::config::{
    DEFAULT_STORAGE_KEY, InventoryConfig, StorageConfig, StorefrontConfig, parse_base_url,
};
use rocketshoes_storefront::middleware::request_id_middleware;
use rocketshoes_storefront::routes;
use rocketshoes_storefront::state::AppState;
use rocketshoes_storefront::storage::{CartStorage, FileStorage};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// A running storefront plus the fakes around it.
pub struct TestContext {
    pub client: reqwest::Client,
    pub inventory: mockito::ServerGuard,
    pub storage_dir: TempDir,
    storefront_url: String,
    server: JoinHandle<()>,
}

impl TestContext {
    /// Start a storefront against a fresh mock inventory and empty storage.
    pub async fn new() -> Self {
        let inventory = mockito::Server::new_async().await;
        let storage_dir = TempDir::new().expect("Failed to create storage dir");
        Self::start(inventory, storage_dir).await
    }

    /// Start a storefront over an existing storage directory.
    pub async fn with_storage(storage_dir: TempDir) -> Self {
        let inventory = mockito::Server::new_async().await;
        Self::start(inventory, storage_dir).await
    }

    async fn start(inventory: mockito::ServerGuard, storage_dir: TempDir) -> Self {
        let (storefront_url, server) = serve(&inventory.url(), storage_dir.path()).await;
        Self {
            client: reqwest::Client::new(),
            inventory,
            storage_dir,
            storefront_url,
            server,
        }
    }

    /// Stop the server and start a new one over the same storage, as a
    /// process restart would.
    pub async fn restart(&mut self) {
        self.server.abort();
        let (url, server) = serve(&self.inventory.url(), self.storage_dir.path()).await;
        self.storefront_url = url;
        self.server = server;
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// `GET /cart` as JSON.
    pub async fn cart(&self) -> Value {
        self.client
            .get(self.url("/cart"))
            .send()
            .await
            .expect("GET /cart failed")
            .json()
            .await
            .expect("GET /cart returned invalid JSON")
    }

    /// `POST /cart/add`.
    pub async fn add(&self, product_id: i32) -> Response {
        self.post("/cart/add", &json!({ "product_id": product_id }))
            .await
    }

    /// `POST /cart/update`.
    pub async fn update(&self, product_id: i32, amount: i64) -> Response {
        self.post(
            "/cart/update",
            &json!({ "product_id": product_id, "amount": amount }),
        )
        .await
    }

    /// `POST /cart/remove`.
    pub async fn remove(&self, product_id: i32) -> Response {
        self.post("/cart/remove", &json!({ "product_id": product_id }))
            .await
    }

    async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap_or_else(|e| panic!("POST {path} failed: {e}"))
    }

    /// Cart JSON as persisted in storage, if anything was written.
    #[must_use]
    pub fn stored_cart(&self) -> Option<Value> {
        FileStorage::new(self.storage_dir.path())
            .get_item(DEFAULT_STORAGE_KEY)
            .expect("Failed to read storage")
            .map(|raw| serde_json::from_str(&raw).expect("Stored cart is not JSON"))
    }

    /// Serve `GET /products/{id}` from the mock inventory.
    pub async fn mock_product(&mut self, id: i32, title: &str, price: f64) -> mockito::Mock {
        self.product_route(id, title, price).create_async().await
    }

    /// Serve `GET /stock/{id}` from the mock inventory.
    pub async fn mock_stock(&mut self, id: i32, amount: u32) -> mockito::Mock {
        self.stock_route(id, amount).create_async().await
    }

    /// Uncreated `GET /products/{id}` mock, for tests that set hit
    /// expectations before creating it.
    pub fn product_route(&mut self, id: i32, title: &str, price: f64) -> mockito::Mock {
        let body = json!({
            "id": id,
            "title": title,
            "price": price,
            "image": format!("https://cdn.example.com/{id}.jpg"),
        });
        self.inventory
            .mock("GET", format!("/products/{id}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
    }

    /// Uncreated `GET /stock/{id}` mock.
    pub fn stock_route(&mut self, id: i32, amount: u32) -> mockito::Mock {
        self.inventory
            .mock("GET", format!("/stock/{id}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "id": id, "amount": amount }).to_string())
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Bind an ephemeral port and serve the storefront routes on it.
async fn serve(inventory_url: &str, storage_dir: &Path) -> (String, JoinHandle<()>) {
    let config = test_config(inventory_url, storage_dir);
    let state = AppState::new(&config);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(routes::routes())
        .with_state(state)
        .layer(middleware::from_fn(request_id_middleware));

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server error");
    });

    (format!("http://{addr}"), server)
}

fn test_config(inventory_url: &str, storage_dir: &Path) -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        inventory: InventoryConfig {
            base_url: parse_base_url(inventory_url).expect("Mock server URL is invalid"),
            product_cache_ttl: Duration::from_secs(300),
        },
        storage: StorageConfig {
            dir: storage_dir.to_path_buf(),
            key: DEFAULT_STORAGE_KEY.to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}
