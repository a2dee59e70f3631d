//! Product comparison resource client.

use serde_json::{Value, json};

use clover_market_core::ProductId;

use crate::error::ApiError;
use crate::http::ApiClient;

/// Client for the `/products/compare` endpoints.
#[derive(Clone)]
pub struct ComparisonApi {
    client: ApiClient,
}

impl ComparisonApi {
    /// Create a comparison client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST /products/compare` - run a comparison over the given products.
    ///
    /// The comparison matrix shape is backend-defined, so it stays an opaque
    /// JSON value for the presentation layer to render.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn compare(&self, product_ids: &[ProductId]) -> Result<Value, ApiError> {
        self.client
            .post("/products/compare", &json!({ "productIds": product_ids }))
            .await
    }

    /// `GET /products/compare?ids=` - fetch comparison data for the given
    /// products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_comparison(&self, product_ids: &[ProductId]) -> Result<Value, ApiError> {
        let ids = product_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.client
            .get("/products/compare", &[("ids", ids)])
            .await
    }
}
