//! Products resource client.

use clover_market_core::ProductId;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{FilterCriteria, Product, ProductInput, ProductPage};

/// Client for the `/products` endpoints.
#[derive(Clone)]
pub struct ProductsApi {
    client: ApiClient,
}

impl ProductsApi {
    /// Create a products client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `GET /products` - paginated product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self, query: &[(&str, String)]) -> Result<ProductPage, ApiError> {
        self.client.get("/products", query).await
    }

    /// `GET /products/:id` - a single product, reviews included.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self, id: ProductId) -> Result<Product, ApiError> {
        self.client.get(&format!("/products/{id}"), &[]).await
    }

    /// `GET /products/search` - free-text search constrained by the active
    /// filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn search(
        &self,
        query: &str,
        filters: &FilterCriteria,
    ) -> Result<ProductPage, ApiError> {
        let mut params = vec![("q", query.to_owned())];
        params.extend(filters.to_query());
        self.client.get("/products/search", &params).await
    }

    /// `GET /products/category/:category` - products in one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn by_category(&self, category: &str) -> Result<ProductPage, ApiError> {
        self.client
            .get(&format!("/products/category/{category}"), &[])
            .await
    }

    /// `POST /products` - create a product (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create(&self, product: &ProductInput) -> Result<Product, ApiError> {
        self.client.post("/products", product).await
    }

    /// `PUT /products/:id` - update a product (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update(&self, id: ProductId, product: &ProductInput) -> Result<Product, ApiError> {
        self.client.put(&format!("/products/{id}"), product).await
    }

    /// `DELETE /products/:id` - delete a product (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, id: ProductId) -> Result<(), ApiError> {
        self.client.delete(&format!("/products/{id}")).await
    }
}
