//! Reviews resource client.
//!
//! Reviews are served nested in the product resource, so the per-product
//! listing fetches the product and projects out its review list.

use serde_json::{Value, json};

use clover_market_core::{ProductId, ReviewId};

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{Review, ReviewInput};

/// Client for the review endpoints.
#[derive(Clone)]
pub struct ReviewsApi {
    client: ApiClient,
}

impl ReviewsApi {
    /// Create a reviews client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Reviews for one product, via `GET /products/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn by_product(&self, product_id: ProductId) -> Result<Vec<Review>, ApiError> {
        let product: crate::models::Product =
            self.client.get(&format!("/products/{product_id}"), &[]).await?;
        Ok(product.reviews)
    }

    /// `POST /products/:id/reviews` - create a review.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create(
        &self,
        product_id: ProductId,
        review: &ReviewInput,
    ) -> Result<Review, ApiError> {
        self.client
            .post(&format!("/products/{product_id}/reviews"), review)
            .await
    }

    /// `PUT /reviews/:id` - update a review.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update(&self, id: ReviewId, review: &ReviewInput) -> Result<Review, ApiError> {
        self.client.put(&format!("/reviews/{id}"), review).await
    }

    /// `DELETE /reviews/:id` - delete a review.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, id: ReviewId) -> Result<(), ApiError> {
        self.client.delete(&format!("/reviews/{id}")).await
    }

    /// `GET /reviews/my-reviews` - the current user's reviews.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn mine(&self) -> Result<Vec<Review>, ApiError> {
        self.client.get("/reviews/my-reviews", &[]).await
    }

    /// `POST /reviews/:id/vote` - mark a review helpful or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn vote(&self, id: ReviewId, helpful: bool) -> Result<Value, ApiError> {
        self.client
            .post(&format!("/reviews/{id}/vote"), &json!({ "helpful": helpful }))
            .await
    }
}
