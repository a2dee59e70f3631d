//! HTTP client shared by all resource clients.
//!
//! Wraps `reqwest` with the backend's conventions: JSON bodies, a bearer
//! token attached to every request once a session exists, and non-success
//! responses mapped to [`ApiError::Status`] carrying the backend's `message`
//! field when one is present.
//!
//! The client is cheaply cloneable; all clones share one connection pool and
//! one bearer-token slot, so the auth store setting a token after login is
//! immediately visible to every resource client.

use std::sync::{Arc, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::ClientConfig;
use crate::error::ApiError;

/// Client for the storefront REST backend.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url_str(),
                token: RwLock::new(None),
            }),
        })
    }

    /// Set the bearer token attached to subsequent requests.
    pub fn set_token(&self, token: &str) {
        if let Ok(mut slot) = self.inner.token.write() {
            *slot = Some(SecretString::from(token.to_owned()));
        }
    }

    /// Stop attaching a bearer token to requests.
    pub fn clear_token(&self) {
        if let Ok(mut slot) = self.inner.token.write() {
            *slot = None;
        }
    }

    /// Whether a bearer token is currently set.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.inner
            .token
            .read()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.inner.token.read() {
            Ok(slot) => match slot.as_ref() {
                Some(token) => request.bearer_auth(token.expose_secret()),
                None => request,
            },
            Err(_) => request,
        }
    }

    /// Issue a GET request.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an
    /// unparseable body.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut request = self.inner.client.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = self.authorize(request).send().await?;
        Self::parse_body(response).await
    }

    /// Issue a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an
    /// unparseable body.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.inner.client.post(self.url(path)).json(body);
        let response = self.authorize(request).send().await?;
        Self::parse_body(response).await
    }

    /// Issue a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an
    /// unparseable body.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.inner.client.put(self.url(path)).json(body);
        let response = self.authorize(request).send().await?;
        Self::parse_body(response).await
    }

    /// Issue a DELETE request, discarding any response body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.inner.client.delete(self.url(path));
        let response = self.authorize(request).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Read the body as text first so failures can be diagnosed, then
    /// deserialize.
    async fn parse_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let text = Self::check_status(response).await?;

        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %text.chars().take(500).collect::<String>(),
                    "Failed to parse backend response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return Ok(text);
        }

        tracing::warn!(
            status = %status,
            body = %text.chars().take(500).collect::<String>(),
            "Backend returned non-success status"
        );

        Err(ApiError::Status {
            status: status.as_u16(),
            message: extract_message(&text, status),
        })
    }
}

/// Pull the backend's `message` field out of an error body, falling back to
/// the status reason.
fn extract_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(message) = value.get("message").and_then(|m| m.as_str())
        && !message.is_empty()
    {
        return message.to_owned();
    }

    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_from_body() {
        let body = r#"{"message":"Insufficient stock","code":42}"#;
        assert_eq!(
            extract_message(body, reqwest::StatusCode::UNPROCESSABLE_ENTITY),
            "Insufficient stock"
        );
    }

    #[test]
    fn test_extract_message_fallback() {
        assert_eq!(
            extract_message("<html>oops</html>", reqwest::StatusCode::NOT_FOUND),
            "Not Found"
        );
        assert_eq!(
            extract_message(r#"{"message":""}"#, reqwest::StatusCode::BAD_REQUEST),
            "Bad Request"
        );
    }

    #[test]
    fn test_token_slot() {
        let config = ClientConfig::new("http://localhost:8080").unwrap();
        let client = ApiClient::new(&config).unwrap();
        assert!(!client.has_token());

        client.set_token("abc.def.ghi");
        assert!(client.has_token());

        // Clones share the token slot
        let clone = client.clone();
        assert!(clone.has_token());

        clone.clear_token();
        assert!(!client.has_token());
    }
}
