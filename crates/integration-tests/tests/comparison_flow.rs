//! Product comparison against the mock backend.

use clover_market_client::error::StoreError;
use clover_market_core::ProductId;
use clover_market_integration_tests::TestContext;
use serde_json::{Value, json};

#[tokio::test]
async fn test_compare_selected_products() {
    let mut ctx = TestContext::new().await;
    ctx.stores.catalog.fetch_products(&[]).await;

    let kettle = ctx.stores.catalog.products()[0].clone();
    let lamp = ctx.stores.catalog.products()[2].clone();
    ctx.stores
        .comparison
        .add_product(kettle)
        .expect("selection has room");
    ctx.stores
        .comparison
        .add_product(lamp)
        .expect("selection has room");

    let data = ctx
        .stores
        .comparison
        .compare()
        .await
        .expect("comparison should succeed");

    assert_eq!(data["productIds"], json!([1, 3]));
    let compared = data["products"]
        .as_array()
        .expect("comparison carries the matched products");
    assert_eq!(compared.len(), 2);
    assert_eq!(ctx.stores.comparison.comparison_data(), Some(&data));
}

#[tokio::test]
async fn test_compare_single_product_never_hits_backend() {
    let mut ctx = TestContext::new().await;
    ctx.stores.catalog.fetch_products(&[]).await;

    let kettle = ctx.stores.catalog.products()[0].clone();
    ctx.stores
        .comparison
        .add_product(kettle)
        .expect("selection has room");

    let err = ctx
        .stores
        .comparison
        .compare()
        .await
        .expect_err("one product is not comparable");
    assert!(matches!(err, StoreError::NotEnoughForComparison));
    assert!(ctx.stores.comparison.comparison_data().is_none());
}

#[tokio::test]
async fn test_fetch_comparison_by_ids() {
    let mut ctx = TestContext::new().await;
    ctx.stores.catalog.fetch_products(&[]).await;

    for index in [0, 1] {
        let product = ctx.stores.catalog.products()[index].clone();
        ctx.stores
            .comparison
            .add_product(product)
            .expect("selection has room");
    }

    ctx.stores.comparison.fetch_comparison().await;

    let data = ctx
        .stores
        .comparison
        .comparison_data()
        .expect("fetch should cache comparison data");
    assert_eq!(data["productIds"], json!([1, 2]));
    assert!(ctx.stores.comparison.error().is_none());
}

#[tokio::test]
async fn test_selection_capacity_is_enforced() {
    let mut ctx = TestContext::new().await;
    ctx.stores.catalog.fetch_products(&[]).await;

    // Only three fixture products exist; pad with synthetic ones
    let mut products: Vec<_> = ctx.stores.catalog.products().to_vec();
    let mut extra = products[0].clone();
    extra.id = ProductId::new(40);
    products.push(extra);
    let mut extra = products[0].clone();
    extra.id = ProductId::new(41);
    products.push(extra);

    let mut added = 0;
    let mut rejected = None;
    for product in products {
        match ctx.stores.comparison.add_product(product) {
            Ok(()) => added += 1,
            Err(e) => {
                rejected = Some(e);
                break;
            }
        }
    }

    assert_eq!(added, 4);
    assert!(matches!(
        rejected,
        Some(StoreError::ComparisonFull { max: 4 })
    ));
    assert!(!ctx.stores.comparison.can_add_more());
}

#[tokio::test]
async fn test_comparison_data_is_opaque_json() {
    let mut ctx = TestContext::new().await;
    ctx.stores.catalog.fetch_products(&[]).await;

    for index in [0, 2] {
        let product = ctx.stores.catalog.products()[index].clone();
        ctx.stores
            .comparison
            .add_product(product)
            .expect("selection has room");
    }

    let data = ctx
        .stores
        .comparison
        .compare()
        .await
        .expect("comparison should succeed");

    // The matrix shape is backend-defined; the store hands it through as-is
    assert!(matches!(data, Value::Object(_)));
}
