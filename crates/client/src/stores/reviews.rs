//! Review store: the viewed product's reviews and derived rating stats.

use tracing::instrument;

use clover_market_core::{ProductId, Rating, ReviewId};

use crate::api::ReviewsApi;
use crate::error::StoreResult;
use crate::models::{Review, ReviewInput};
use crate::stores::action_error;

/// Transient cache of one product's reviews, plus the current user's own
/// reviews. Discarded and re-fetched on navigation, never reconciled
/// incrementally.
pub struct ReviewStore {
    api: ReviewsApi,
    reviews: Vec<Review>,
    my_reviews: Vec<Review>,
    loading: bool,
    error: Option<String>,
}

impl ReviewStore {
    /// Create an empty review store.
    #[must_use]
    pub fn new(api: ReviewsApi) -> Self {
        Self {
            api,
            reviews: Vec::new(),
            my_reviews: Vec::new(),
            loading: false,
            error: None,
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Load the review list for one product, replacing the cache.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn fetch_reviews(&mut self, product_id: ProductId) {
        self.loading = true;
        self.error = None;

        match self.api.by_product(product_id).await {
            Ok(reviews) => self.reviews = reviews,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch reviews");
                self.error = Some(action_error(&e, "Failed to fetch reviews"));
            }
        }

        self.loading = false;
    }

    /// Seed the cache directly from an already-fetched product.
    pub fn set_reviews_from_product(&mut self, reviews: Vec<Review>) {
        self.reviews = reviews;
    }

    /// Create a review and prepend it to the cache.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording it in the error field.
    #[instrument(skip(self, review), fields(product_id = %product_id))]
    pub async fn create_review(
        &mut self,
        product_id: ProductId,
        review: &ReviewInput,
    ) -> StoreResult<Review> {
        self.loading = true;
        self.error = None;

        let result = self.api.create(product_id, review).await;
        self.loading = false;

        match result {
            Ok(created) => {
                self.reviews.insert(0, created.clone());
                Ok(created)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create review");
                self.error = Some(action_error(&e, "Failed to create review"));
                Err(e.into())
            }
        }
    }

    /// Update a review, replacing the cached copy on success.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording it in the error field.
    #[instrument(skip(self, review), fields(review_id = %review_id))]
    pub async fn update_review(
        &mut self,
        review_id: ReviewId,
        review: &ReviewInput,
    ) -> StoreResult<Review> {
        self.loading = true;
        self.error = None;

        let result = self.api.update(review_id, review).await;
        self.loading = false;

        match result {
            Ok(updated) => {
                if let Some(cached) = self.reviews.iter_mut().find(|r| r.id == review_id) {
                    *cached = updated.clone();
                }
                Ok(updated)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to update review");
                self.error = Some(action_error(&e, "Failed to update review"));
                Err(e.into())
            }
        }
    }

    /// Delete a review and drop it from the cache.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording it in the error field.
    #[instrument(skip(self), fields(review_id = %review_id))]
    pub async fn delete_review(&mut self, review_id: ReviewId) -> StoreResult<()> {
        self.loading = true;
        self.error = None;

        let result = self.api.delete(review_id).await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.reviews.retain(|r| r.id != review_id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to delete review");
                self.error = Some(action_error(&e, "Failed to delete review"));
                Err(e.into())
            }
        }
    }

    /// Load the current user's reviews.
    #[instrument(skip(self))]
    pub async fn fetch_my_reviews(&mut self) {
        self.loading = true;
        self.error = None;

        match self.api.mine().await {
            Ok(reviews) => self.my_reviews = reviews,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch own reviews");
                self.error = Some(action_error(&e, "Failed to fetch your reviews"));
            }
        }

        self.loading = false;
    }

    /// Mark a review helpful or not.
    ///
    /// The matching counter is incremented optimistically and reverted if
    /// the backend rejects the vote, so the cached counters never drift from
    /// what the backend accepted. Failures are logged, not surfaced.
    #[instrument(skip(self), fields(review_id = %review_id, helpful = helpful))]
    pub async fn vote(&mut self, review_id: ReviewId, helpful: bool) {
        Self::bump_counter(&mut self.reviews, review_id, helpful, 1);

        if let Err(e) = self.api.vote(review_id, helpful).await {
            tracing::warn!(error = %e, "Vote rejected, reverting counter");
            Self::bump_counter(&mut self.reviews, review_id, helpful, -1);
        }
    }

    fn bump_counter(reviews: &mut [Review], review_id: ReviewId, helpful: bool, delta: i32) {
        if let Some(review) = reviews.iter_mut().find(|r| r.id == review_id) {
            let counter = if helpful {
                &mut review.helpful_count
            } else {
                &mut review.not_helpful_count
            };
            *counter = counter.saturating_add_signed(delta);
        }
    }

    // =========================================================================
    // Derived views & accessors
    // =========================================================================

    /// Mean rating rounded to one decimal place; 0 for an empty cache.
    #[must_use]
    pub fn average_rating(&self) -> f64 {
        if self.reviews.is_empty() {
            return 0.0;
        }

        let sum: u32 = self.reviews.iter().map(|r| u32::from(r.rating.stars())).sum();
        #[allow(clippy::cast_precision_loss)] // Review counts stay far below f64 precision
        let mean = f64::from(sum) / self.reviews.len() as f64;
        (mean * 10.0).round() / 10.0
    }

    /// Review counts per star, index 0 holding one-star counts.
    #[must_use]
    pub fn rating_distribution(&self) -> [u32; 5] {
        let mut distribution = [0u32; 5];
        for review in &self.reviews {
            let index = usize::from(review.rating.stars() - Rating::MIN);
            if let Some(slot) = distribution.get_mut(index) {
                *slot += 1;
            }
        }
        distribution
    }

    /// The cached reviews for the viewed product.
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// The current user's reviews.
    #[must_use]
    pub fn my_reviews(&self) -> &[Review] {
        &self.my_reviews
    }

    /// Whether a review action is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last action's error message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
