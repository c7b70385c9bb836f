//! End-to-end cart flows through the HTTP surface.
//!
//! Every test runs a real storefront (HTTP inventory client, file storage)
//! against a mock inventory API.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use rocketshoes_core::{Cart, ProductId};
use rocketshoes_integration_tests::TestContext;
use serde_json::{Value, json};
use tempfile::TempDir;

/// File name `FileStorage` uses for the default cart key.
const STORED_CART_FILE: &str = "_RocketShoes_cart.json";

fn amounts(cart: &Value) -> Vec<(i64, i64)> {
    cart["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| (item["id"].as_i64().unwrap(), item["amount"].as_i64().unwrap()))
        .collect()
}

/// Storage directory holding a cart saved by an earlier session.
fn stored(entries: &[(i32, u32)]) -> TempDir {
    let cart: Vec<Value> = entries
        .iter()
        .map(|&(id, amount)| {
            json!({
                "id": id,
                "title": format!("Tenis {id}"),
                "price": 99.9,
                "image": format!("https://cdn.example.com/{id}.jpg"),
                "amount": amount,
            })
        })
        .collect();

    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(STORED_CART_FILE),
        Value::from(cart).to_string(),
    )
    .unwrap();
    dir
}

async fn error_code(resp: reqwest::Response) -> String {
    let body: Value = resp.json().await.unwrap();
    body["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;
    let resp = ctx.client.get(ctx.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_add_new_product_persists_entry() {
    let mut ctx = TestContext::new().await;
    let _stock = ctx.mock_stock(1, 3).await;
    let _product = ctx.mock_product(1, "Tenis Runner", 100.0).await;

    let resp = ctx.add(1).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["hx-trigger"], "cart-updated");

    let cart: Value = resp.json().await.unwrap();
    assert_eq!(amounts(&cart), vec![(1, 1)]);
    assert_eq!(cart["items"][0]["title"], "Tenis Runner");

    let stored = ctx.stored_cart().unwrap();
    assert_eq!(stored[0]["id"], 1);
    assert_eq!(stored[0]["amount"], 1);
    assert_eq!(stored[0]["title"], "Tenis Runner");
}

#[tokio::test]
async fn test_add_existing_product_increments_without_refetching_details() {
    let mut ctx = TestContext::new().await;
    let _stock = ctx.mock_stock(1, 3).await;
    let product = ctx
        .product_route(1, "Tenis Runner", 100.0)
        .expect(1)
        .create_async()
        .await;

    ctx.add(1).await;
    let resp = ctx.add(1).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cart: Value = resp.json().await.unwrap();
    assert_eq!(amounts(&cart), vec![(1, 2)]);
    product.assert_async().await;
}

#[tokio::test]
async fn test_add_beyond_stock_is_rejected() {
    let mut ctx = TestContext::new().await;
    let _stock = ctx.mock_stock(1, 1).await;
    let _product = ctx.mock_product(1, "Tenis Runner", 100.0).await;

    assert_eq!(ctx.add(1).await.status(), StatusCode::OK);
    let stored_before = ctx.stored_cart();

    let resp = ctx.add(1).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(resp).await, "out_of_stock");

    assert_eq!(amounts(&ctx.cart().await), vec![(1, 1)]);
    assert_eq!(ctx.stored_cart(), stored_before);
}

#[tokio::test]
async fn test_add_with_zero_stock_writes_nothing() {
    let mut ctx = TestContext::new().await;
    let _stock = ctx.mock_stock(4, 0).await;
    let product = ctx
        .product_route(4, "Tenis Trail", 80.0)
        .expect(0)
        .create_async()
        .await;

    let resp = ctx.add(4).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(resp).await, "out_of_stock");

    assert!(ctx.stored_cart().is_none());
    product.assert_async().await;
}

#[tokio::test]
async fn test_add_with_missing_stock_record_is_out_of_stock() {
    let mut ctx = TestContext::new().await;
    let _missing = ctx
        .inventory
        .mock("GET", "/stock/8")
        .with_status(404)
        .create_async()
        .await;

    let resp = ctx.add(8).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(resp).await, "out_of_stock");
}

#[tokio::test]
async fn test_add_unknown_product_is_add_failure() {
    let mut ctx = TestContext::new().await;
    let _stock = ctx.mock_stock(9, 5).await;
    let _missing = ctx
        .inventory
        .mock("GET", "/products/9")
        .with_status(404)
        .create_async()
        .await;

    let resp = ctx.add(9).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(error_code(resp).await, "add_failed");
    assert!(ctx.stored_cart().is_none());
}

#[tokio::test]
async fn test_update_sets_amount_within_stock() {
    let mut ctx = TestContext::new().await;
    let _stock = ctx.mock_stock(2, 5).await;
    let _product = ctx.mock_product(2, "Tenis Street", 50.0).await;
    ctx.add(2).await;

    let resp = ctx.update(2, 5).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(amounts(&resp.json().await.unwrap()), vec![(2, 5)]);
    assert_eq!(ctx.stored_cart().unwrap()[0]["amount"], 5);
}

#[tokio::test]
async fn test_update_rejects_non_positive_amounts() {
    let mut ctx = TestContext::with_storage(stored(&[(2, 1)])).await;
    let stock = ctx.stock_route(2, 5).expect(0).create_async().await;

    for amount in [0, -1] {
        let resp = ctx.update(2, amount).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error_code(resp).await, "invalid_quantity");
    }

    assert_eq!(amounts(&ctx.cart().await), vec![(2, 1)]);
    stock.assert_async().await;
}

#[tokio::test]
async fn test_update_beyond_stock_keeps_cart() {
    let mut ctx = TestContext::new().await;
    let _stock = ctx.mock_stock(2, 5).await;
    let _product = ctx.mock_product(2, "Tenis Street", 50.0).await;
    ctx.add(2).await;

    let resp = ctx.update(2, 6).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(amounts(&ctx.cart().await), vec![(2, 1)]);
    assert_eq!(ctx.stored_cart().unwrap()[0]["amount"], 1);
}

#[tokio::test]
async fn test_update_product_not_in_cart_changes_nothing() {
    let mut ctx = TestContext::new().await;
    let _stock = ctx.mock_stock(3, 10).await;

    let resp = ctx.update(3, 2).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("hx-trigger").is_none());
    assert!(amounts(&resp.json().await.unwrap()).is_empty());
    assert!(ctx.stored_cart().is_none());
}

#[tokio::test]
async fn test_update_with_inventory_down_is_update_failure() {
    let mut ctx = TestContext::with_storage(stored(&[(2, 1)])).await;
    let _down = ctx
        .inventory
        .mock("GET", "/stock/2")
        .with_status(503)
        .create_async()
        .await;

    let resp = ctx.update(2, 2).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(error_code(resp).await, "update_failed");
    assert_eq!(amounts(&ctx.cart().await), vec![(2, 1)]);
}

#[tokio::test]
async fn test_remove_product() {
    let mut ctx = TestContext::new().await;
    let _s1 = ctx.mock_stock(1, 3).await;
    let _p1 = ctx.mock_product(1, "Tenis Runner", 100.0).await;
    let _s2 = ctx.mock_stock(2, 3).await;
    let _p2 = ctx.mock_product(2, "Tenis Street", 50.0).await;
    ctx.add(1).await;
    ctx.add(2).await;

    let resp = ctx.remove(1).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(amounts(&resp.json().await.unwrap()), vec![(2, 1)]);

    let stored: Cart = serde_json::from_value(ctx.stored_cart().unwrap()).unwrap();
    assert!(!stored.contains(ProductId::new(1)));
    assert!(stored.contains(ProductId::new(2)));
}

#[tokio::test]
async fn test_remove_absent_product_is_remove_failure() {
    let ctx = TestContext::new().await;

    let resp = ctx.remove(7).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_code(resp).await, "remove_failed");
    assert!(ctx.stored_cart().is_none());
}

#[tokio::test]
async fn test_cart_totals() {
    let mut ctx = TestContext::new().await;
    let _s1 = ctx.mock_stock(1, 3).await;
    let _p1 = ctx.mock_product(1, "Tenis Runner", 100.0).await;
    let _s2 = ctx.mock_stock(2, 3).await;
    let _p2 = ctx.mock_product(2, "Tenis Street", 50.0).await;
    ctx.add(1).await;
    ctx.add(1).await;
    ctx.add(2).await;

    let cart = ctx.cart().await;
    assert_eq!(cart["item_count"], 3);
    assert!((cart["subtotal"].as_f64().unwrap() - 250.0).abs() < f64::EPSILON);

    let count: Value = ctx
        .client
        .get(ctx.url("/cart/count"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(count["count"], 3);
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let mut ctx = TestContext::new().await;
    let _stock = ctx.mock_stock(1, 3).await;
    let _product = ctx.mock_product(1, "Tenis Runner", 100.0).await;
    ctx.add(1).await;
    ctx.add(1).await;

    ctx.restart().await;

    assert_eq!(amounts(&ctx.cart().await), vec![(1, 2)]);
}

#[tokio::test]
async fn test_restores_cart_written_by_previous_session() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(STORED_CART_FILE),
        r#"[{"id":5,"title":"Tenis Court","price":129.9,"image":"https://cdn.example.com/5.jpg","amount":2}]"#,
    )
    .unwrap();

    let ctx = TestContext::with_storage(dir).await;
    let cart = ctx.cart().await;
    assert_eq!(amounts(&cart), vec![(5, 2)]);
    assert_eq!(cart["items"][0]["title"], "Tenis Court");
}

#[tokio::test]
async fn test_malformed_stored_cart_starts_empty() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(STORED_CART_FILE), "not json").unwrap();

    let ctx = TestContext::with_storage(dir).await;
    assert!(amounts(&ctx.cart().await).is_empty());
}

#[tokio::test]
async fn test_rejects_malformed_request_body() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/cart/add"))
        .json(&json!({ "product": "one" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(resp).await, "bad_request");
}
