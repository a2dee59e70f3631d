//! Integration test support for the Clover Market client.
//!
//! [`MockBackend`] is an in-process stand-in for the storefront REST
//! backend, bound to an ephemeral port per test. It serves the backend's
//! actual wire shapes so the client's normalization paths are exercised
//! end to end: the `content`/`totalElements` pagination envelope on the
//! listing endpoint, a bare array on search, a legacy single-string
//! `category` on one fixture product, and bearer tokens whose payload
//! segment carries a `sub` claim.
//!
//! [`TestContext`] pairs a backend with a fully wired
//! [`StoreContext`](clover_market_client::StoreContext) over in-memory
//! storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once, PoisonError};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};

use clover_market_client::storage::{MemoryStorage, Storage};
use clover_market_client::{ClientConfig, StoreContext};

/// Password every fixture account accepts.
pub const TEST_PASSWORD: &str = "letmein";

static INIT_TRACING: Once = Once::new();

/// Install a test subscriber honoring `RUST_LOG`, once per process.
fn init_tracing() {
    INIT_TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

// =============================================================================
// Backend state & fixtures
// =============================================================================

struct BackendState {
    products: Vec<Value>,
    orders: Vec<Value>,
    next_order_id: i64,
}

type Shared = Arc<Mutex<BackendState>>;

fn lock(state: &Shared) -> std::sync::MutexGuard<'_, BackendState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn fixture_products() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "name": "Electric Kettle",
            "description": "Boils water fast",
            "price": 10.0,
            "categories": [{"name": "Kitchen"}],
            "reviews": [
                {
                    "id": 11,
                    "rating": 5,
                    "comment": "Great kettle",
                    "author": "alice",
                    "helpfulCount": 2,
                    "notHelpfulCount": 0
                },
                {
                    "id": 12,
                    "rating": 3,
                    "helpfulCount": 0,
                    "notHelpfulCount": 1
                }
            ]
        }),
        // Legacy shape: single category string, no reviews
        json!({
            "id": 2,
            "name": "Ceramic Mug",
            "price": 5.0,
            "category": "Kitchen"
        }),
        json!({
            "id": 3,
            "name": "Desk Lamp",
            "description": "Adjustable arm",
            "price": 24.0,
            "categories": [{"name": "Office"}]
        }),
    ]
}

fn mint_token(email: &str) -> String {
    let payload = URL_SAFE_NO_PAD.encode(json!({ "sub": email }).to_string());
    format!("header.{payload}.signature")
}

fn error_body(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "message": message })))
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_products(State(state): State<Shared>) -> Json<Value> {
    let state = lock(&state);
    Json(json!({
        "content": state.products,
        "totalElements": state.products.len(),
    }))
}

async fn get_product(
    State(state): State<Shared>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    let state = lock(&state);
    state
        .products
        .iter()
        .find(|p| p.get("id").and_then(Value::as_i64) == Some(id))
        .map_or_else(
            || error_body(StatusCode::NOT_FOUND, "Product not found"),
            |product| (StatusCode::OK, Json(product.clone())),
        )
}

/// Search returns a bare array, unlike the enveloped listing.
async fn search_products(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let needle = params.get("q").cloned().unwrap_or_default().to_lowercase();
    let state = lock(&state);
    let matches: Vec<Value> = state
        .products
        .iter()
        .filter(|p| {
            p.get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();
    Json(Value::Array(matches))
}

async fn post_comparison(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let Some(ids) = body.get("productIds").and_then(Value::as_array).cloned() else {
        return error_body(StatusCode::BAD_REQUEST, "productIds is required");
    };
    (StatusCode::OK, Json(comparison_for(&state, &ids)))
}

async fn get_comparison(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let ids: Vec<Value> = params
        .get("ids")
        .map(|raw| {
            raw.split(',')
                .filter_map(|s| s.parse::<i64>().ok())
                .map(Value::from)
                .collect()
        })
        .unwrap_or_default();
    (StatusCode::OK, Json(comparison_for(&state, &ids)))
}

fn comparison_for(state: &Shared, ids: &[Value]) -> Value {
    let state = lock(state);
    let products: Vec<Value> = state
        .products
        .iter()
        .filter(|p| {
            p.get("id")
                .is_some_and(|id| ids.iter().any(|wanted| wanted == id))
        })
        .cloned()
        .collect();
    json!({ "productIds": ids, "products": products })
}

async fn create_order(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let Some(items) = body.get("items").and_then(Value::as_array) else {
        return error_body(StatusCode::BAD_REQUEST, "items is required");
    };
    if items.is_empty() {
        return error_body(StatusCode::UNPROCESSABLE_ENTITY, "Cart is empty");
    }

    let mut state = lock(&state);
    let id = state.next_order_id;
    state.next_order_id += 1;

    let order = json!({
        "id": id,
        "items": items,
        "totalAmount": body.get("totalAmount").cloned().unwrap_or(json!(0.0)),
        "status": "PENDING",
    });
    state.orders.push(order.clone());
    (StatusCode::CREATED, Json(order))
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();

    if email.is_empty() || password != TEST_PASSWORD {
        return error_body(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    (StatusCode::OK, Json(json!({ "token": mint_token(email) })))
}

async fn register(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let Some(email) = body.get("email").and_then(Value::as_str) else {
        return error_body(StatusCode::BAD_REQUEST, "email is required");
    };
    (
        StatusCode::CREATED,
        Json(json!({ "token": mint_token(email) })),
    )
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let Some(subject) = bearer_subject(&headers) else {
        return error_body(StatusCode::UNAUTHORIZED, "Unauthorized");
    };
    (StatusCode::OK, Json(json!({ "email": subject })))
}

fn bearer_subject(headers: &HeaderMap) -> Option<String> {
    let token = headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;
    let payload = token.split('.').nth(1)?;
    let decoded = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Value = serde_json::from_slice(&decoded).ok()?;
    claims
        .get("sub")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

async fn vote(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let helpful = body
        .get("helpful")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    let key = if helpful { "helpfulCount" } else { "notHelpfulCount" };

    let mut state = lock(&state);
    for product in &mut state.products {
        let Some(reviews) = product.get_mut("reviews").and_then(Value::as_array_mut) else {
            continue;
        };
        for review in reviews {
            if review.get("id").and_then(Value::as_i64) == Some(id) {
                let count = review.get(key).and_then(Value::as_u64).unwrap_or(0) + 1;
                if let Some(fields) = review.as_object_mut() {
                    fields.insert(key.to_owned(), json!(count));
                }
                return (StatusCode::OK, Json(review.clone()));
            }
        }
    }
    error_body(StatusCode::NOT_FOUND, "Review not found")
}

// =============================================================================
// Test harness
// =============================================================================

/// In-process mock of the storefront backend.
pub struct MockBackend {
    /// Base URL of the bound server, e.g. `http://127.0.0.1:49152`.
    pub base_url: String,
    state: Shared,
}

impl MockBackend {
    /// Bind the mock backend to an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState {
            products: fixture_products(),
            orders: Vec::new(),
            next_order_id: 1000,
        }));

        let app = Router::new()
            .route("/products", get(list_products))
            .route("/products/search", get(search_products))
            .route("/products/compare", get(get_comparison).post(post_comparison))
            .route("/products/{id}", get(get_product))
            .route("/orders", post(create_order))
            .route("/auth/login", post(login))
            .route("/auth/register", post(register))
            .route("/auth/me", get(me))
            .route("/reviews/{id}/vote", post(vote))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Failed to read bound address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock backend exited");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Orders the backend has accepted, in creation order.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        lock(&self.state).orders.clone()
    }

    /// A review's `(helpful, notHelpful)` counters as the backend stores
    /// them.
    #[must_use]
    pub fn review_counts(&self, review_id: i64) -> Option<(u64, u64)> {
        let state = lock(&self.state);
        for product in &state.products {
            let reviews = product.get("reviews").and_then(Value::as_array)?;
            for review in reviews {
                if review.get("id").and_then(Value::as_i64) == Some(review_id) {
                    return Some((
                        review.get("helpfulCount").and_then(Value::as_u64).unwrap_or(0),
                        review
                            .get("notHelpfulCount")
                            .and_then(Value::as_u64)
                            .unwrap_or(0),
                    ));
                }
            }
        }
        None
    }
}

/// A mock backend plus a store context wired to it over in-memory storage.
pub struct TestContext {
    pub backend: MockBackend,
    pub stores: StoreContext,
    pub storage: Arc<dyn Storage>,
}

impl TestContext {
    /// Start a backend and build an initialized store context against it.
    ///
    /// # Panics
    ///
    /// Panics if the backend or the client cannot be constructed.
    pub async fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::new())).await
    }

    /// Like [`Self::new`], but over pre-seeded storage, for tests that
    /// exercise restore paths.
    ///
    /// # Panics
    ///
    /// Panics if the backend or the client cannot be constructed.
    pub async fn with_storage(storage: Arc<dyn Storage>) -> Self {
        init_tracing();
        let backend = MockBackend::start().await;
        let config =
            ClientConfig::new(&backend.base_url).expect("Mock backend URL should be valid");
        let mut stores = StoreContext::new(&config, Arc::clone(&storage))
            .expect("Failed to build store context");
        stores.init();

        Self {
            backend,
            stores,
            storage,
        }
    }
}
