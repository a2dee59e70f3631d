//! Error types for the client SDK.
//!
//! Two layers, following the backend/store split:
//!
//! - [`ApiError`] - failures talking to the backend (transport, non-success
//!   status, body parse). Produced by the HTTP client and resource clients.
//! - [`StoreError`] - everything a store action can fail with: an API error,
//!   a local validation failure (comparison capacity, selection count), or a
//!   malformed session token.

use thiserror::Error;

use crate::session::TokenError;

/// Errors from the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend responded with a non-success status.
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Backend-provided message, or a generic fallback.
        message: String,
    },

    /// Response body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// The backend's own message for this failure, when it sent one.
    ///
    /// Store actions use this to fill their user-visible `error` field,
    /// falling back to an action-specific default for transport and parse
    /// failures.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

/// Errors from store actions.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Comparison selection is already at capacity.
    #[error("maximum {max} products can be compared")]
    ComparisonFull {
        /// Maximum number of products in a comparison selection.
        max: usize,
    },

    /// Too few products selected to run a comparison.
    #[error("at least 2 products are required for comparison")]
    NotEnoughForComparison,

    /// Session token could not be decoded.
    #[error("invalid session token: {0}")]
    InvalidToken(#[from] TokenError),
}

/// Result type alias for store actions.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
