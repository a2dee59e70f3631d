//! Theme store: the persisted dark-mode flag.

use std::sync::Arc;

use crate::storage::{Storage, keys};

/// Holds the dark-mode flag. Light is the default; every change persists
/// immediately.
pub struct ThemeStore {
    storage: Arc<dyn Storage>,
    is_dark: bool,
}

impl ThemeStore {
    /// Create a theme store in the default light mode. Call [`Self::init`]
    /// to restore a persisted preference.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            is_dark: false,
        }
    }

    /// Restore the persisted preference; anything other than a stored
    /// `"true"` leaves the default light mode.
    pub fn init(&mut self) {
        self.is_dark = self
            .storage
            .get(keys::THEME_IS_DARK)
            .is_some_and(|raw| raw == "true");
    }

    /// Flip between light and dark.
    pub fn toggle(&mut self) {
        self.set_dark(!self.is_dark);
    }

    /// Set the mode explicitly.
    pub fn set_dark(&mut self, is_dark: bool) {
        self.is_dark = is_dark;
        self.storage
            .set(keys::THEME_IS_DARK, if is_dark { "true" } else { "false" });
    }

    /// Whether dark mode is active.
    #[must_use]
    pub const fn is_dark(&self) -> bool {
        self.is_dark
    }
}
