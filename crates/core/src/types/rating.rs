//! Review rating type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Rating`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingError {
    /// The value is outside the 1-5 star range.
    #[error("rating must be between 1 and 5 stars (got {0})")]
    OutOfRange(u8),
}

/// A star rating on a product review.
///
/// Always within 1-5 inclusive; the bounds are enforced at construction and
/// during deserialization, so a `Rating` held in memory is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Minimum allowed rating.
    pub const MIN: u8 = 1;
    /// Maximum allowed rating.
    pub const MAX: u8 = 5;

    /// Create a new rating.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::OutOfRange`] if `stars` is not within 1-5.
    pub const fn new(stars: u8) -> Result<Self, RatingError> {
        if stars >= Self::MIN && stars <= Self::MAX {
            Ok(Self(stars))
        } else {
            Err(RatingError::OutOfRange(stars))
        }
    }

    /// Get the number of stars.
    #[must_use]
    pub const fn stars(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
