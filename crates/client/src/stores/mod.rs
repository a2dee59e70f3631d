//! Client-side state stores.
//!
//! Each store is an explicit context object owning one slice of UI state:
//! the catalog, the cart, the comparison selection, reviews, the auth
//! session, and the theme flag. Stores are created once at application start
//! (see [`crate::context::StoreContext`]) and mutated only through their own
//! actions, which take `&mut self`; networked actions are async suspension
//! points the caller awaits. Nothing here locks - the single-owner model is
//! the concurrency design.
//!
//! Failure policy: actions that the UI awaits directly (checkout, create
//! review, compare, login, ...) record a human-readable message in the
//! store's `error` field and re-throw; list fetches and review votes record
//! or log only.

mod auth;
mod cart;
mod catalog;
mod comparison;
mod reviews;
mod theme;

pub use auth::AuthStore;
pub use cart::CartStore;
pub use catalog::CatalogStore;
pub use comparison::ComparisonStore;
pub use reviews::ReviewStore;
pub use theme::ThemeStore;

use crate::error::ApiError;

/// User-facing message for a failed action: the backend's own message when
/// it sent one, otherwise the action's fallback.
pub(crate) fn action_error(err: &ApiError, fallback: &str) -> String {
    err.backend_message()
        .map_or_else(|| fallback.to_owned(), ToOwned::to_owned)
}
