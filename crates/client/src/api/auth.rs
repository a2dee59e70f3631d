//! Authentication resource client.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{AccountProfile, AuthResponse, Credentials, NewAccount, Registration};

/// Roles attached to accounts created through the standalone registration
/// endpoint.
const DEFAULT_ROLES: &[&str] = &["USER_ROLE"];

/// Client for the `/auth` and `/users` endpoints.
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    /// Create an auth client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST /auth/login` - exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.client.post("/auth/login", credentials).await
    }

    /// `POST /auth/register` - create an account and receive a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        self.client.post("/auth/register", registration).await
    }

    /// `GET /auth/me` - the current account's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn me(&self) -> Result<AccountProfile, ApiError> {
        self.client.get("/auth/me", &[]).await
    }

    /// `POST /users` - the standalone registration endpoint; does not return
    /// a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_user(&self, account: &NewAccount) -> Result<Value, ApiError> {
        let mut payload = match serde_json::to_value(account)? {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        payload.insert("enabled".to_owned(), Value::Bool(true));
        payload.insert(
            "roles".to_owned(),
            Value::Array(DEFAULT_ROLES.iter().map(|&r| r.into()).collect()),
        );

        self.client.post("/users", &payload).await
    }
}
