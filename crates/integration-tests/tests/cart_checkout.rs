//! Cart checkout against the mock backend.

use clover_market_integration_tests::TestContext;
use clover_market_client::storage::keys;
use rust_decimal::dec;
use serde_json::{Map, Value, json};

#[tokio::test]
async fn test_checkout_submits_order_and_clears_cart() {
    let mut ctx = TestContext::new().await;
    ctx.stores.catalog.fetch_products(&[]).await;

    let kettle = ctx.stores.catalog.products()[0].clone();
    let mug = ctx.stores.catalog.products()[1].clone();
    ctx.stores.cart.add_item(&kettle, 2);
    ctx.stores.cart.add_item(&mug, 1);
    assert_eq!(ctx.stores.cart.subtotal(), dec!(25));

    let mut details = Map::new();
    details.insert(
        "shippingAddress".to_owned(),
        Value::String("1 Main St".to_owned()),
    );
    let order = ctx
        .stores
        .cart
        .checkout(details)
        .await
        .expect("checkout should succeed");

    assert_eq!(order.total_amount, dec!(25));
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.status.as_deref(), Some("PENDING"));

    // Cart empties in memory and in storage only after the backend accepts
    assert!(!ctx.stores.cart.has_items());
    assert_eq!(ctx.storage.get(keys::CART_ITEMS).as_deref(), Some("[]"));

    let accepted = ctx.backend.orders();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0]["totalAmount"], json!(25.0));
}

#[tokio::test]
async fn test_checkout_empty_cart_is_rejected_and_recorded() {
    let mut ctx = TestContext::new().await;

    let result = ctx.stores.cart.checkout(Map::new()).await;

    assert!(result.is_err());
    assert_eq!(ctx.stores.cart.error(), Some("Cart is empty"));
    assert!(ctx.backend.orders().is_empty());
}
