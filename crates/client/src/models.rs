//! Wire and domain models for the storefront backend.
//!
//! The backend is loose about shapes in two places, and both are normalized
//! at ingestion so nothing downstream branches on wire format:
//!
//! - a product carries either a single `category` string or a `categories`
//!   array of `{ name }` objects - both fold into `Vec<Category>`;
//! - a product listing is either a pagination envelope
//!   (`content` + `totalElements`) or a bare array - both fold into
//!   [`ProductPage`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use clover_market_core::{Category, ProductId, Rating, ReviewId};

// =============================================================================
// Products
// =============================================================================

/// A product in the catalog.
///
/// Owned by the backend; the catalog store caches it read-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "ProductWire", rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Normalized category labels (see module docs).
    pub categories: Vec<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Reviews arrive nested in the product resource.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub reviews: Vec<Review>,
}

/// Raw product shape as served by the backend.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductWire {
    id: ProductId,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    categories: Vec<CategoryEntry>,
    #[serde(default, alias = "imgUrl")]
    image_url: Option<String>,
    #[serde(default)]
    reviews: Vec<Review>,
}

/// One entry of a wire-level category list: a bare label or a `{ name }`
/// object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CategoryEntry {
    Label(String),
    Object { name: String },
}

impl CategoryEntry {
    fn into_label(self) -> String {
        match self {
            Self::Label(name) | Self::Object { name } => name,
        }
    }
}

impl From<ProductWire> for Product {
    fn from(wire: ProductWire) -> Self {
        // The array form wins when both are present; the single string is
        // the legacy shape.
        let categories = if wire.categories.is_empty() {
            wire.category.into_iter().map(Category::from).collect()
        } else {
            wire.categories
                .into_iter()
                .map(|entry| Category::from(entry.into_label()))
                .collect()
        };

        Self {
            id: wire.id,
            name: wire.name,
            description: wire.description,
            price: wire.price,
            categories,
            image_url: wire.image_url,
            reviews: wire.reviews,
        }
    }
}

/// Payload for creating or updating a product (admin endpoints).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// One page of a product listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "ProductPageWire")]
pub struct ProductPage {
    pub items: Vec<Product>,
    /// Total element count across all pages; for the bare-array shape this
    /// is just the array length.
    pub total: u64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProductPageWire {
    Paged {
        content: Vec<Product>,
        #[serde(rename = "totalElements")]
        total_elements: u64,
    },
    Plain(Vec<Product>),
}

impl From<ProductPageWire> for ProductPage {
    fn from(wire: ProductPageWire) -> Self {
        match wire {
            ProductPageWire::Paged {
                content,
                total_elements,
            } => Self {
                items: content,
                total: total_elements,
            },
            ProductPageWire::Plain(items) => Self {
                total: items.len() as u64,
                items,
            },
        }
    }
}

// =============================================================================
// Filtering
// =============================================================================

/// Active catalog filter criteria.
///
/// Absent criteria (`None` / empty search) pass every product through; active
/// criteria combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Category label, matched case-insensitively.
    pub category: Option<String>,
    /// Minimum price, inclusive.
    pub min_price: Option<Decimal>,
    /// Maximum price, inclusive.
    pub max_price: Option<Decimal>,
    /// Free-text search over name, description and category labels.
    pub search: String,
}

/// A single-field update to [`FilterCriteria`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    Category(Option<String>),
    MinPrice(Option<Decimal>),
    MaxPrice(Option<Decimal>),
    Search(String),
}

impl FilterCriteria {
    /// Apply a single-field update.
    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Category(category) => self.category = category,
            FilterUpdate::MinPrice(min_price) => self.min_price = min_price,
            FilterUpdate::MaxPrice(max_price) => self.max_price = max_price,
            FilterUpdate::Search(search) => self.search = search,
        }
    }

    /// Whether `product` satisfies every active criterion.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category
            && !product.categories.iter().any(|c| c.matches(category))
        {
            return false;
        }

        if let Some(min_price) = self.min_price
            && product.price < min_price
        {
            return false;
        }

        if let Some(max_price) = self.max_price
            && product.price > max_price
        {
            return false;
        }

        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let name_match = product.name.to_lowercase().contains(&needle);
            let description_match = product
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            let category_match = product
                .categories
                .iter()
                .any(|c| c.contains_ignore_case(&needle));

            if !(name_match || description_match || category_match) {
                return false;
            }
        }

        true
    }

    /// Filter criteria as query parameters for the search endpoint.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(category) = &self.category {
            query.push(("category", category.clone()));
        }
        if let Some(min_price) = self.min_price {
            query.push(("minPrice", min_price.to_string()));
        }
        if let Some(max_price) = self.max_price {
            query.push(("maxPrice", max_price.to_string()));
        }
        query
    }
}

// =============================================================================
// Reviews
// =============================================================================

/// A product review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub rating: Rating,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub helpful_count: u32,
    #[serde(default)]
    pub not_helpful_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating or updating a review.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub rating: Rating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

// =============================================================================
// Cart & Orders
// =============================================================================

/// A cart line item: one product with a quantity and a price snapshotted at
/// add time.
///
/// Serialized form matches the persisted `cart.items` key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Always >= 1; a quantity of zero removes the line instead.
    pub quantity: u32,
}

impl CartLine {
    /// Line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// One line of an order payload or response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            quantity: line.quantity,
            price: line.price,
        }
    }
}

/// An order as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: clover_market_core::OrderId,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating an order at checkout.
///
/// `details` carries caller-supplied metadata (shipping address, contact
/// info, ...) flattened into the top-level object, exactly as the backend
/// expects it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    #[serde(flatten)]
    pub details: Map<String, Value>,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

// =============================================================================
// Auth
// =============================================================================

/// Login credentials.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration payload for `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

/// Account form for the standalone `POST /users` registration endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
}

/// Token response from login/register.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// Profile returned by `GET /auth/me`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub email: String,
    #[serde(default, alias = "username")]
    pub name: Option<String>,
}
