//! Review fetching and helpfulness voting against the mock backend.

use clover_market_core::ReviewId;
use clover_market_integration_tests::TestContext;

const KETTLE: clover_market_core::ProductId = clover_market_core::ProductId::new(1);

#[tokio::test]
async fn test_fetch_reviews_projects_from_product() {
    let mut ctx = TestContext::new().await;

    ctx.stores.reviews.fetch_reviews(KETTLE).await;

    assert_eq!(ctx.stores.reviews.reviews().len(), 2);
    assert!(ctx.stores.reviews.error().is_none());
    // (5 + 3) / 2
    assert!((ctx.stores.reviews.average_rating() - 4.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_accepted_vote_sticks_on_both_sides() {
    let mut ctx = TestContext::new().await;
    ctx.stores.reviews.fetch_reviews(KETTLE).await;

    ctx.stores.reviews.vote(ReviewId::new(11), true).await;

    let cached = ctx
        .stores
        .reviews
        .reviews()
        .iter()
        .find(|r| r.id == ReviewId::new(11))
        .expect("review 11 should be cached");
    assert_eq!(cached.helpful_count, 3);
    assert_eq!(ctx.backend.review_counts(11), Some((3, 0)));
}

#[tokio::test]
async fn test_rejected_vote_reverts_cached_counter() {
    let mut ctx = TestContext::new().await;
    ctx.stores.reviews.fetch_reviews(KETTLE).await;

    // Seed a review the backend does not know, so the vote comes back 404
    let mut reviews = ctx.stores.reviews.reviews().to_vec();
    let mut phantom = reviews[0].clone();
    phantom.id = ReviewId::new(999);
    phantom.helpful_count = 7;
    reviews.push(phantom);
    ctx.stores.reviews.set_reviews_from_product(reviews);

    ctx.stores.reviews.vote(ReviewId::new(999), true).await;

    let cached = ctx
        .stores
        .reviews
        .reviews()
        .iter()
        .find(|r| r.id == ReviewId::new(999))
        .expect("seeded review should be cached");
    assert_eq!(cached.helpful_count, 7);
}

#[tokio::test]
async fn test_not_helpful_vote_touches_other_counter() {
    let mut ctx = TestContext::new().await;
    ctx.stores.reviews.fetch_reviews(KETTLE).await;

    ctx.stores.reviews.vote(ReviewId::new(12), false).await;

    assert_eq!(ctx.backend.review_counts(12), Some((0, 2)));
    let cached = ctx
        .stores
        .reviews
        .reviews()
        .iter()
        .find(|r| r.id == ReviewId::new(12))
        .expect("review 12 should be cached");
    assert_eq!(cached.helpful_count, 0);
    assert_eq!(cached.not_helpful_count, 2);
}
