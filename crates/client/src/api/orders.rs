//! Orders resource client.

use serde_json::json;

use clover_market_core::OrderId;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{Order, OrderCreate};

/// Client for the `/orders` endpoints.
#[derive(Clone)]
pub struct OrdersApi {
    client: ApiClient,
}

impl OrdersApi {
    /// Create an orders client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `GET /orders` - the current user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self, query: &[(&str, String)]) -> Result<Vec<Order>, ApiError> {
        self.client.get("/orders", query).await
    }

    /// `GET /orders/:id` - a single order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self, id: OrderId) -> Result<Order, ApiError> {
        self.client.get(&format!("/orders/{id}"), &[]).await
    }

    /// `POST /orders` - create an order from a checkout payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create(&self, order: &OrderCreate) -> Result<Order, ApiError> {
        self.client.post("/orders", order).await
    }

    /// `PUT /orders/:id/status` - update an order's status (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_status(&self, id: OrderId, status: &str) -> Result<Order, ApiError> {
        self.client
            .put(&format!("/orders/{id}/status"), &json!({ "status": status }))
            .await
    }

    /// `POST /orders/:id/cancel` - cancel an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn cancel(&self, id: OrderId) -> Result<Order, ApiError> {
        self.client
            .post(&format!("/orders/{id}/cancel"), &json!({}))
            .await
    }

    /// `GET /orders/history` - the current user's order history.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn history(&self, query: &[(&str, String)]) -> Result<Vec<Order>, ApiError> {
        self.client.get("/orders/history", query).await
    }
}
