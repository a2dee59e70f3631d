//! Clover Market client library.
//!
//! Typed HTTP client and state stores for the Clover Market storefront
//! backend: catalog browsing with filters, a persistent cart, product
//! comparison, reviews with helpfulness votes, and token-based auth.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod models;
pub mod session;
pub mod storage;
pub mod stores;

pub use config::ClientConfig;
pub use context::StoreContext;
pub use error::{ApiError, StoreError, StoreResult};
pub use http::ApiClient;
