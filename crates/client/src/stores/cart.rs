//! Cart store: line items, derived totals, checkout.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::instrument;

use clover_market_core::ProductId;

use crate::api::OrdersApi;
use crate::error::StoreResult;
use crate::models::{CartLine, Order, OrderCreate, OrderItem, Product};
use crate::storage::{Storage, keys};
use crate::stores::action_error;

/// Holds the selected line items and turns them into an order at checkout.
///
/// Lines snapshot the product's name, price and image at add time, so later
/// catalog changes never touch the cart. Lines persist to storage on every
/// mutation and survive a reload.
pub struct CartStore {
    api: OrdersApi,
    storage: Arc<dyn Storage>,
    items: Vec<CartLine>,
    loading: bool,
    error: Option<String>,
}

impl CartStore {
    /// Create a cart store, restoring persisted lines.
    #[must_use]
    pub fn new(api: OrdersApi, storage: Arc<dyn Storage>) -> Self {
        let items = storage
            .get(keys::CART_ITEMS)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        Self {
            api,
            storage,
            items,
            loading: false,
            error: None,
        }
    }

    // =========================================================================
    // Line mutations
    // =========================================================================

    /// Add `quantity` of a product. Merges into an existing line for the
    /// same product id; otherwise appends a snapshot line. A zero quantity
    /// is a no-op.
    pub fn add_item(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        if let Some(line) = self.items.iter_mut().find(|l| l.product_id == product.id) {
            line.quantity += quantity;
        } else {
            self.items.push(CartLine {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                image_url: product.image_url.clone(),
                quantity,
            });
        }

        self.persist();
    }

    /// Remove the line for a product, if present.
    pub fn remove_item(&mut self, product_id: ProductId) {
        let before = self.items.len();
        self.items.retain(|l| l.product_id != product_id);
        if self.items.len() != before {
            self.persist();
        }
    }

    /// Set a line's quantity; zero removes the line.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove_item(product_id);
            return;
        }

        if let Some(line) = self.items.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
            self.persist();
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Submit the cart as an order.
    ///
    /// Builds the order payload from the current lines, the given metadata
    /// and the derived total. The cart is cleared only after the backend
    /// accepts the order; on failure the contents are preserved and the
    /// backend's message recorded.
    ///
    /// Overlapping calls are not deduplicated - preventing double submission
    /// is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording it in the error field.
    #[instrument(skip(self, details))]
    pub async fn checkout(&mut self, details: Map<String, Value>) -> StoreResult<Order> {
        self.loading = true;
        self.error = None;

        let payload = OrderCreate {
            details,
            items: self.items.iter().map(OrderItem::from).collect(),
            total_amount: self.total(),
        };

        let result = self.api.create(&payload).await;
        self.loading = false;

        match result {
            Ok(order) => {
                self.clear();
                Ok(order)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Checkout failed");
                self.error = Some(action_error(&e, "Failed to create order"));
                Err(e.into())
            }
        }
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    /// Sum of price x quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartLine::line_total).sum()
    }

    /// Order total. No tax or shipping is computed, so this equals the
    /// subtotal.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.subtotal()
    }

    /// Whether the cart has any lines.
    #[must_use]
    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The current lines.
    #[must_use]
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    /// Whether a checkout is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last checkout's error message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn persist(&self) {
        if let Ok(raw) = serde_json::to_string(&self.items) {
            self.storage.set(keys::CART_ITEMS, &raw);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    use clover_market_core::Category;

    use crate::config::ClientConfig;
    use crate::http::ApiClient;
    use crate::storage::MemoryStorage;

    fn store() -> CartStore {
        store_on(Arc::new(MemoryStorage::new()))
    }

    fn store_on(storage: Arc<dyn Storage>) -> CartStore {
        let config = ClientConfig::new("http://localhost:8080").unwrap();
        let client = ApiClient::new(&config).unwrap();
        CartStore::new(OrdersApi::new(client), storage)
    }

    fn product(id: i64, name: &str, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: None,
            price,
            categories: vec![Category::from("Test")],
            image_url: None,
            reviews: vec![],
        }
    }

    #[test]
    fn test_add_item_merges_same_product() {
        let mut cart = store();
        let kettle = product(1, "Kettle", dec!(10));

        cart.add_item(&kettle, 2);
        cart.add_item(&kettle, 3);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
    }

    #[test]
    fn test_add_item_snapshots_price() {
        let mut cart = store();
        let mut kettle = product(1, "Kettle", dec!(10));
        cart.add_item(&kettle, 1);

        // A later catalog price change does not touch the line
        kettle.price = dec!(99);
        assert_eq!(cart.items()[0].price, dec!(10));
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = store();
        cart.add_item(&product(1, "Kettle", dec!(10)), 2);

        cart.update_quantity(ProductId::new(1), 0);
        assert!(!cart.has_items());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = store();
        cart.add_item(&product(1, "Kettle", dec!(10)), 1);

        cart.remove_item(ProductId::new(99));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_totals() {
        let mut cart = store();
        cart.add_item(&product(1, "Kettle", dec!(10)), 2);
        cart.add_item(&product(2, "Mug", dec!(5)), 1);

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), dec!(25));
        assert_eq!(cart.total(), dec!(25));
    }

    #[test]
    fn test_lines_persist_and_restore() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        {
            let mut cart = store_on(Arc::clone(&storage));
            cart.add_item(&product(1, "Kettle", dec!(10)), 2);
        }

        let restored = store_on(Arc::clone(&storage));
        assert_eq!(restored.items().len(), 1);
        assert_eq!(restored.items()[0].quantity, 2);
        assert_eq!(restored.items()[0].price, dec!(10));
    }

    #[test]
    fn test_corrupt_persisted_lines_ignored() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.set(keys::CART_ITEMS, "not json");

        let cart = store_on(storage);
        assert!(!cart.has_items());
    }

    #[tokio::test]
    async fn test_checkout_failure_preserves_cart() {
        let config = ClientConfig::new("http://127.0.0.1:9").unwrap();
        let client = ApiClient::new(&config).unwrap();
        let mut cart = CartStore::new(
            OrdersApi::new(client),
            Arc::new(MemoryStorage::new()),
        );
        cart.add_item(&product(1, "Kettle", dec!(10)), 2);

        let result = cart.checkout(Map::new()).await;

        assert!(result.is_err());
        assert_eq!(cart.items().len(), 1);
        assert!(cart.error().is_some());
    }
}
