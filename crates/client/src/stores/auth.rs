//! Auth session store: bearer token and derived identity.
//!
//! The token is the only durable session state. Identity (email + display
//! name) is always recomputed by decoding the token's payload segment, never
//! persisted on its own, so a reload can only ever restore a session the
//! token still vouches for.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use clover_market_core::Email;

use crate::api::AuthApi;
use crate::error::StoreResult;
use crate::http::ApiClient;
use crate::models::{Credentials, NewAccount, Registration};
use crate::session::{UserIdentity, decode_identity};
use crate::storage::{Storage, keys};

/// Holds the current session: bearer token, derived identity, authenticated
/// flag. Hands the token to the shared [`ApiClient`] so every resource
/// client attaches it.
pub struct AuthStore {
    api: AuthApi,
    client: ApiClient,
    storage: Arc<dyn Storage>,
    token: Option<SecretString>,
    user: Option<UserIdentity>,
    authenticated: bool,
}

impl AuthStore {
    /// Create a signed-out auth store. Call [`Self::init_auth`] to restore a
    /// persisted session.
    #[must_use]
    pub fn new(api: AuthApi, client: ApiClient, storage: Arc<dyn Storage>) -> Self {
        Self {
            api,
            client,
            storage,
            token: None,
            user: None,
            authenticated: false,
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Exchange credentials for a token and open a session.
    ///
    /// # Errors
    ///
    /// Returns the API error when the backend rejects the credentials. A
    /// token that decodes to no identity still opens the session.
    #[instrument(skip_all)]
    pub async fn login(&mut self, credentials: &Credentials) -> StoreResult<()> {
        let response = self.api.login(credentials).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Login failed");
        })?;

        self.adopt_token(response.token);
        Ok(())
    }

    /// Register an account and open a session with the returned token.
    ///
    /// # Errors
    ///
    /// Returns the API error when registration is rejected.
    #[instrument(skip_all)]
    pub async fn register(&mut self, registration: &Registration) -> StoreResult<()> {
        let response = self.api.register(registration).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Registration failed");
        })?;

        self.adopt_token(response.token);
        Ok(())
    }

    /// Create an account through the standalone `/users` endpoint. Does not
    /// open a session.
    ///
    /// # Errors
    ///
    /// Returns the API error when account creation is rejected.
    #[instrument(skip_all)]
    pub async fn register_user(&self, account: &NewAccount) -> StoreResult<()> {
        self.api.create_user(account).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Account creation failed");
        })?;
        Ok(())
    }

    /// Close the session: clears memory, persisted keys and the shared
    /// client's token, synchronously.
    pub fn logout(&mut self) {
        self.token = None;
        self.user = None;
        self.authenticated = false;
        self.client.clear_token();
        self.storage.remove(keys::TOKEN);
        self.storage.remove(keys::USER);
    }

    /// Restore a persisted session at startup.
    ///
    /// Re-derives identity from the stored token; a token that no longer
    /// decodes triggers a full [`Self::logout`] rather than leaving an
    /// authenticated session with no identity.
    pub fn init_auth(&mut self) {
        let Some(token) = self.storage.get(keys::TOKEN) else {
            return;
        };

        match decode_identity(&token) {
            Ok(identity) => {
                self.client.set_token(&token);
                self.token = Some(SecretString::from(token));
                self.user = Some(identity);
                self.authenticated = true;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Persisted token no longer decodes, logging out");
                self.logout();
            }
        }
    }

    /// Refresh identity from the backend's `/auth/me`; logs out when the
    /// backend no longer recognizes the session.
    #[instrument(skip(self))]
    pub async fn fetch_user(&mut self) {
        match self.api.me().await {
            Ok(profile) => match Email::parse(&profile.email) {
                Ok(email) => {
                    let name = profile
                        .name
                        .unwrap_or_else(|| email.local_part().to_owned());
                    self.user = Some(UserIdentity { email, name });
                    self.authenticated = true;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Profile email unusable, logging out");
                    self.logout();
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Session rejected by backend, logging out");
                self.logout();
            }
        }
    }

    /// Take a fresh token: persist it, attach it to the shared client, and
    /// derive identity from it. A decode failure leaves identity empty
    /// without failing the surrounding action.
    fn adopt_token(&mut self, token: String) {
        self.user = match decode_identity(&token) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::debug!(error = %e, "Token payload does not decode to an identity");
                None
            }
        };

        self.storage.set(keys::TOKEN, &token);
        self.client.set_token(&token);
        self.token = Some(SecretString::from(token));
        self.authenticated = true;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Whether a session is open.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// The derived identity, if the token decoded to one.
    #[must_use]
    pub const fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    /// Display name, `"Guest"` when signed out or identity-less.
    #[must_use]
    pub fn user_name(&self) -> &str {
        self.user.as_ref().map_or("Guest", |u| u.name.as_str())
    }

    /// Account email, empty when signed out or identity-less.
    #[must_use]
    pub fn user_email(&self) -> &str {
        self.user.as_ref().map_or("", |u| u.email.as_str())
    }

    /// The raw bearer token, for callers that need to hand it elsewhere.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().map(ExposeSecret::expose_secret)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    use crate::config::ClientConfig;
    use crate::storage::MemoryStorage;

    fn make_token(payload_json: &str) -> String {
        let payload = URL_SAFE_NO_PAD.encode(payload_json);
        format!("header.{payload}.signature")
    }

    fn store_on(storage: Arc<dyn Storage>) -> AuthStore {
        let config = ClientConfig::new("http://localhost:8080").unwrap();
        let client = ApiClient::new(&config).unwrap();
        AuthStore::new(AuthApi::new(client.clone()), client, storage)
    }

    #[test]
    fn test_init_auth_restores_identity_from_token() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.set(keys::TOKEN, &make_token(r#"{"sub":"alice@example.com"}"#));

        let mut store = store_on(storage);
        store.init_auth();

        assert!(store.is_authenticated());
        assert_eq!(store.user_name(), "alice");
        assert_eq!(store.user_email(), "alice@example.com");
    }

    #[test]
    fn test_init_auth_without_token_stays_signed_out() {
        let mut store = store_on(Arc::new(MemoryStorage::new()));
        store.init_auth();
        assert!(!store.is_authenticated());
        assert_eq!(store.user_name(), "Guest");
    }

    #[test]
    fn test_init_auth_malformed_token_logs_out() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.set(keys::TOKEN, "garbage");
        storage.set(keys::USER, "{\"stale\":true}");

        let mut store = store_on(Arc::clone(&storage));
        store.init_auth();

        assert!(!store.is_authenticated());
        assert_eq!(storage.get(keys::TOKEN), None);
        assert_eq!(storage.get(keys::USER), None);
    }

    #[test]
    fn test_logout_clears_everything() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.set(keys::TOKEN, &make_token(r#"{"sub":"bob@shop.test"}"#));

        let mut store = store_on(Arc::clone(&storage));
        store.init_auth();
        assert!(store.is_authenticated());

        store.logout();
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        assert!(store.token().is_none());
        assert_eq!(storage.get(keys::TOKEN), None);
    }

    #[test]
    fn test_adopt_token_with_opaque_payload_keeps_session() {
        let mut store = store_on(Arc::new(MemoryStorage::new()));
        store.adopt_token("an.opaque.token".to_owned());

        // Session opens even though no identity could be derived
        assert!(store.is_authenticated());
        assert!(store.user().is_none());
        assert_eq!(store.user_name(), "Guest");
    }
}
