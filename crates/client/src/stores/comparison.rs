//! Comparison store: up to four selected products and fetched comparison
//! data.

use std::sync::Arc;

use serde_json::Value;
use tracing::instrument;

use clover_market_core::ProductId;

use crate::api::ComparisonApi;
use crate::error::{StoreError, StoreResult};
use crate::models::Product;
use crate::storage::{Storage, keys};
use crate::stores::action_error;

/// Holds an ordered selection of distinct products and the comparison matrix
/// fetched for them. The selection persists across reloads; the matrix does
/// not.
pub struct ComparisonStore {
    api: ComparisonApi,
    storage: Arc<dyn Storage>,
    selected: Vec<Product>,
    comparison_data: Option<Value>,
    loading: bool,
    error: Option<String>,
}

impl ComparisonStore {
    /// Maximum number of products in a selection.
    pub const MAX_PRODUCTS: usize = 4;

    /// Minimum number of products a comparison needs.
    pub const MIN_PRODUCTS: usize = 2;

    /// Create a comparison store, restoring a persisted selection.
    #[must_use]
    pub fn new(api: ComparisonApi, storage: Arc<dyn Storage>) -> Self {
        let selected = storage
            .get(keys::COMPARISON_SELECTED)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        Self {
            api,
            storage,
            selected,
            comparison_data: None,
            loading: false,
            error: None,
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Add a product to the selection.
    ///
    /// A duplicate id is a no-op; a full selection is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ComparisonFull`] when the selection already
    /// holds [`Self::MAX_PRODUCTS`] products.
    pub fn add_product(&mut self, product: Product) -> StoreResult<()> {
        if self.selected.len() >= Self::MAX_PRODUCTS {
            return Err(StoreError::ComparisonFull {
                max: Self::MAX_PRODUCTS,
            });
        }

        if !self.selected.iter().any(|p| p.id == product.id) {
            self.selected.push(product);
            self.persist();
        }

        Ok(())
    }

    /// Remove a product from the selection. Emptying the selection discards
    /// any cached comparison data.
    pub fn remove_product(&mut self, product_id: ProductId) {
        self.selected.retain(|p| p.id != product_id);
        if self.selected.is_empty() {
            self.comparison_data = None;
        }
        self.persist();
    }

    /// Drop the whole selection and any cached comparison data.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.comparison_data = None;
        self.persist();
    }

    // =========================================================================
    // Comparison
    // =========================================================================

    /// Run a comparison over the selected products and cache the result.
    /// The last successful comparison is retained when a new request fails.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotEnoughForComparison`] - without issuing a
    /// request - when fewer than two products are selected, or the API error
    /// after recording it.
    #[instrument(skip(self))]
    pub async fn compare(&mut self) -> StoreResult<Value> {
        if self.selected.len() < Self::MIN_PRODUCTS {
            return Err(StoreError::NotEnoughForComparison);
        }

        self.loading = true;
        self.error = None;

        let result = self.api.compare(&self.product_ids()).await;
        self.loading = false;

        match result {
            Ok(data) => {
                self.comparison_data = Some(data.clone());
                Ok(data)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Comparison failed");
                self.error = Some(action_error(&e, "Failed to compare products"));
                Err(e.into())
            }
        }
    }

    /// Fetch comparison data for the current selection, swallowing failures
    /// into the error field. A no-op on an empty selection.
    #[instrument(skip(self))]
    pub async fn fetch_comparison(&mut self) {
        if self.selected.is_empty() {
            return;
        }

        self.loading = true;
        self.error = None;

        match self.api.get_comparison(&self.product_ids()).await {
            Ok(data) => self.comparison_data = Some(data),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch comparison");
                self.error = Some(action_error(&e, "Failed to fetch comparison"));
            }
        }

        self.loading = false;
    }

    // =========================================================================
    // Derived views & accessors
    // =========================================================================

    /// Ids of the selected products, in selection order.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.selected.iter().map(|p| p.id).collect()
    }

    /// Whether another product can be added.
    #[must_use]
    pub fn can_add_more(&self) -> bool {
        self.selected.len() < Self::MAX_PRODUCTS
    }

    /// Whether anything is selected.
    #[must_use]
    pub fn has_products(&self) -> bool {
        !self.selected.is_empty()
    }

    /// The selected products, in selection order.
    #[must_use]
    pub fn selected(&self) -> &[Product] {
        &self.selected
    }

    /// The cached comparison matrix, if any.
    #[must_use]
    pub const fn comparison_data(&self) -> Option<&Value> {
        self.comparison_data.as_ref()
    }

    /// Whether a comparison request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last action's error message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn persist(&self) {
        if let Ok(raw) = serde_json::to_string(&self.selected) {
            self.storage.set(keys::COMPARISON_SELECTED, &raw);
        }
    }
}
