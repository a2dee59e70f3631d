//! Normalized product category label.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A product category label, normalized at ingestion.
///
/// The backend serves categories in two shapes: a single `category` string on
/// older product records, or a `categories` array of `{ name }` objects on
/// newer ones. Both are folded into a plain list of `Category` values when a
/// product is deserialized, so nothing downstream branches on wire shape.
///
/// Label comparison is case-insensitive; the original casing is preserved for
/// display.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Create a category from a label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive label equality.
    #[must_use]
    pub fn matches(&self, label: &str) -> bool {
        self.0.eq_ignore_ascii_case(label)
    }

    /// Case-insensitive substring check against the label.
    #[must_use]
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        self.0.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Self(label.to_owned())
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
