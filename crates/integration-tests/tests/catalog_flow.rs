//! Catalog browsing against the mock backend: listing, single product,
//! search, filters over fetched data.

use clover_market_core::{Category, ProductId};
use clover_market_integration_tests::TestContext;
use rust_decimal::dec;

#[tokio::test]
async fn test_fetch_products_replaces_list_and_total() {
    let mut ctx = TestContext::new().await;

    ctx.stores.catalog.fetch_products(&[]).await;

    assert_eq!(ctx.stores.catalog.products().len(), 3);
    assert_eq!(ctx.stores.catalog.total(), 3);
    assert!(ctx.stores.catalog.error().is_none());
    assert!(!ctx.stores.catalog.is_loading());
}

#[tokio::test]
async fn test_legacy_category_string_is_normalized() {
    let mut ctx = TestContext::new().await;
    ctx.stores.catalog.fetch_products(&[]).await;

    let mug = ctx
        .stores
        .catalog
        .products()
        .iter()
        .find(|p| p.id == ProductId::new(2))
        .expect("fixture product 2 should be listed");
    assert_eq!(mug.categories, vec![Category::from("Kitchen")]);
}

#[tokio::test]
async fn test_all_categories_from_mixed_wire_shapes() {
    let mut ctx = TestContext::new().await;
    ctx.stores.catalog.fetch_products(&[]).await;

    assert_eq!(ctx.stores.catalog.all_categories(), vec!["Kitchen", "Office"]);
}

#[tokio::test]
async fn test_fetch_product_sets_current_with_reviews() {
    let mut ctx = TestContext::new().await;

    let product = ctx
        .stores
        .catalog
        .fetch_product(ProductId::new(1))
        .await
        .expect("product 1 should exist");

    assert_eq!(product.name, "Electric Kettle");
    assert_eq!(product.price, dec!(10));
    assert_eq!(product.reviews.len(), 2);
    assert_eq!(
        ctx.stores.catalog.current_product().map(|p| p.id),
        Some(ProductId::new(1))
    );
}

#[tokio::test]
async fn test_fetch_missing_product_surfaces_backend_message() {
    let mut ctx = TestContext::new().await;

    let result = ctx.stores.catalog.fetch_product(ProductId::new(99)).await;

    assert!(result.is_err());
    assert_eq!(ctx.stores.catalog.error(), Some("Product not found"));
}

#[tokio::test]
async fn test_search_handles_bare_array_response() {
    let mut ctx = TestContext::new().await;

    ctx.stores.catalog.search_products("lamp").await;

    assert_eq!(ctx.stores.catalog.products().len(), 1);
    assert_eq!(ctx.stores.catalog.products()[0].name, "Desk Lamp");
}
