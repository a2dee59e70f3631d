//! Core types for Clover Market.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod rating;

pub use category::Category;
pub use email::{Email, EmailError};
pub use id::*;
pub use rating::{Rating, RatingError};
