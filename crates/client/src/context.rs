//! Application store context: every store wired to one shared [`ApiClient`].

use std::sync::Arc;

use crate::api::{AuthApi, ComparisonApi, OrdersApi, ProductsApi, ReviewsApi};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::storage::Storage;
use crate::stores::{
    AuthStore, CartStore, CatalogStore, ComparisonStore, ReviewStore, ThemeStore,
};

/// All stores for one application instance.
///
/// One [`ApiClient`] is shared by every store, so a token adopted by the
/// auth store is attached to every subsequent request. Fields are public:
/// the owner borrows whichever store an action needs.
pub struct StoreContext {
    pub catalog: CatalogStore,
    pub cart: CartStore,
    pub comparison: ComparisonStore,
    pub reviews: ReviewStore,
    pub auth: AuthStore,
    pub theme: ThemeStore,
}

impl StoreContext {
    /// Build the full store set over one HTTP client and one storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig, storage: Arc<dyn Storage>) -> Result<Self, ApiError> {
        let client = ApiClient::new(config)?;

        Ok(Self {
            catalog: CatalogStore::new(ProductsApi::new(client.clone())),
            cart: CartStore::new(OrdersApi::new(client.clone()), Arc::clone(&storage)),
            comparison: ComparisonStore::new(
                ComparisonApi::new(client.clone()),
                Arc::clone(&storage),
            ),
            reviews: ReviewStore::new(ReviewsApi::new(client.clone())),
            auth: AuthStore::new(AuthApi::new(client.clone()), client, Arc::clone(&storage)),
            theme: ThemeStore::new(storage),
        })
    }

    /// Restore persisted state at startup: theme preference and, when a
    /// stored token still decodes, the auth session.
    pub fn init(&mut self) {
        self.theme.init();
        self.auth.init_auth();
    }
}
