//! Product catalog store: fetched product list, filter criteria, pagination.

use std::collections::BTreeSet;

use tracing::instrument;

use clover_market_core::ProductId;

use crate::api::ProductsApi;
use crate::error::StoreResult;
use crate::models::{FilterCriteria, FilterUpdate, Product};
use crate::stores::action_error;

const DEFAULT_PAGE_SIZE: u32 = 12;

/// Holds the fetched product list, the active filter criteria, and the
/// pagination cursor. Filtering is a derived view recomputed on each read;
/// pagination is server-driven, so changing the page re-fetches.
pub struct CatalogStore {
    api: ProductsApi,
    products: Vec<Product>,
    current_product: Option<Product>,
    loading: bool,
    error: Option<String>,
    filters: FilterCriteria,
    page: u32,
    page_size: u32,
    total: u64,
}

impl CatalogStore {
    /// Create an empty catalog store.
    #[must_use]
    pub fn new(api: ProductsApi) -> Self {
        Self {
            api,
            products: Vec::new(),
            current_product: None,
            loading: false,
            error: None,
            filters: FilterCriteria::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total: 0,
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Fetch the product listing, merging `params` with the current
    /// page/page-size state (explicit params win).
    ///
    /// On success the in-memory list is replaced wholesale and the total
    /// count recorded. On failure the prior list stays available and only
    /// the error field is updated.
    #[instrument(skip(self, params))]
    pub async fn fetch_products(&mut self, params: &[(&str, String)]) {
        self.loading = true;
        self.error = None;

        let mut query = params.to_vec();
        if !query.iter().any(|(key, _)| *key == "page") {
            query.push(("page", self.page.to_string()));
        }
        if !query.iter().any(|(key, _)| *key == "size") {
            query.push(("size", self.page_size.to_string()));
        }

        match self.api.list(&query).await {
            Ok(page) => {
                self.products = page.items;
                self.total = page.total;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch products");
                self.error = Some(action_error(&e, "Failed to fetch products"));
            }
        }

        self.loading = false;
    }

    /// Fetch a single product into `current_product`.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording it in the error field.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn fetch_product(&mut self, id: ProductId) -> StoreResult<Product> {
        self.loading = true;
        self.error = None;

        let result = self.api.get(id).await;
        self.loading = false;

        match result {
            Ok(product) => {
                self.current_product = Some(product.clone());
                Ok(product)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch product");
                self.error = Some(action_error(&e, "Failed to fetch product"));
                Err(e.into())
            }
        }
    }

    /// Run a server-side search constrained by the active filters, replacing
    /// the product list on success.
    #[instrument(skip(self))]
    pub async fn search_products(&mut self, query: &str) {
        self.loading = true;
        self.error = None;

        match self.api.search(query, &self.filters).await {
            Ok(page) => self.products = page.items,
            Err(e) => {
                tracing::warn!(error = %e, "Product search failed");
                self.error = Some(action_error(&e, "Product search failed"));
            }
        }

        self.loading = false;
    }

    /// Mutate one filter field.
    pub fn set_filter(&mut self, update: FilterUpdate) {
        self.filters.apply(update);
    }

    /// Reset all four filter fields.
    pub fn clear_filters(&mut self) {
        self.filters = FilterCriteria::default();
    }

    /// Move the pagination cursor and re-fetch.
    pub async fn set_page(&mut self, page: u32) {
        self.page = page;
        self.fetch_products(&[]).await;
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// The fetched products satisfying every active filter criterion.
    #[must_use]
    pub fn filtered_products(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| self.filters.matches(p))
            .collect()
    }

    /// Sorted distinct category labels across the fetched products.
    #[must_use]
    pub fn all_categories(&self) -> Vec<String> {
        let labels: BTreeSet<String> = self
            .products
            .iter()
            .flat_map(|p| p.categories.iter())
            .map(|c| c.as_str().to_owned())
            .collect();
        labels.into_iter().collect()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The full (unfiltered) fetched product list.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// The most recently fetched single product, if any.
    #[must_use]
    pub fn current_product(&self) -> Option<&Product> {
        self.current_product.as_ref()
    }

    /// The active filter criteria.
    #[must_use]
    pub const fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last action's error message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current page cursor (1-based).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Server-reported total element count.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
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

    fn store_with(products: Vec<Product>) -> CatalogStore {
        let config = ClientConfig::new("http://localhost:8080").unwrap();
        let client = ApiClient::new(&config).unwrap();
        let mut store = CatalogStore::new(ProductsApi::new(client));
        store.products = products;
        store
    }

    fn product(id: i64, name: &str, price: rust_decimal::Decimal, cats: &[&str]) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: None,
            price,
            categories: cats.iter().map(|&c| Category::from(c)).collect(),
            image_url: None,
            reviews: vec![],
        }
    }

    fn fixture() -> Vec<Product> {
        vec![
            product(1, "Electric Kettle", dec!(39.5), &["Kitchen"]),
            product(2, "Desk Lamp", dec!(24), &["Lighting", "Office"]),
            product(3, "Cast Iron Pan", dec!(60), &["Kitchen"]),
        ]
    }

    #[test]
    fn test_filtered_view_is_subset_with_and_semantics() {
        let mut store = store_with(fixture());
        store.set_filter(FilterUpdate::Category(Some("kitchen".to_owned())));
        store.set_filter(FilterUpdate::MinPrice(Some(dec!(40))));

        let filtered = store.filtered_products();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Cast Iron Pan");

        // Every filtered product is in the full list and passes every predicate
        for p in &filtered {
            assert!(store.products().contains(p));
            assert!(store.filters().matches(p));
        }
    }

    #[test]
    fn test_clear_filters_restores_full_list() {
        let mut store = store_with(fixture());
        store.set_filter(FilterUpdate::Search("lamp".to_owned()));
        assert_eq!(store.filtered_products().len(), 1);

        store.clear_filters();
        assert_eq!(store.filtered_products().len(), store.products().len());
        assert_eq!(store.filters(), &FilterCriteria::default());
    }

    #[test]
    fn test_search_matches_category_labels() {
        let mut store = store_with(fixture());
        store.set_filter(FilterUpdate::Search("office".to_owned()));

        let filtered = store.filtered_products();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Desk Lamp");
    }

    #[test]
    fn test_all_categories_sorted_distinct() {
        let store = store_with(fixture());
        assert_eq!(
            store.all_categories(),
            vec!["Kitchen", "Lighting", "Office"]
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_prior_list() {
        // Point the client at a port nothing listens on
        let config = ClientConfig::new("http://127.0.0.1:9").unwrap();
        let client = ApiClient::new(&config).unwrap();
        let mut store = CatalogStore::new(ProductsApi::new(client));
        store.products = fixture();

        store.fetch_products(&[]).await;

        assert_eq!(store.products().len(), 3);
        assert!(store.error().is_some());
        assert!(!store.is_loading());
    }
}
