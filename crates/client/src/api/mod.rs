//! Resource clients for the storefront backend.
//!
//! One thin request builder per backend resource, one method per endpoint.
//! No business logic lives here - the stores own state transitions and error
//! recording; these clients only shape requests and deserialize responses.

mod auth;
mod comparison;
mod orders;
mod products;
mod reviews;

pub use auth::AuthApi;
pub use comparison::ComparisonApi;
pub use orders::OrdersApi;
pub use products::ProductsApi;
pub use reviews::ReviewsApi;
