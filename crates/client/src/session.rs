//! Session token decoding.
//!
//! The backend issues a JWT-shaped bearer token. The token itself is treated
//! as opaque (no signature verification happens client-side), but its middle
//! segment is base64url-encoded JSON whose `sub` claim carries the account
//! email. The signed-in identity is always recomputed from the token, never
//! stored independently, so the token is the single durable source of truth
//! across reloads.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use thiserror::Error;

use clover_market_core::{Email, EmailError};

/// Errors that can occur when decoding a session token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token does not have the three dot-separated JWT segments.
    #[error("token is not a three-segment JWT")]
    MalformedStructure,

    /// The payload segment is not valid base64url.
    #[error("payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded payload is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload's subject claim is missing or empty.
    #[error("payload has no subject claim")]
    MissingSubject,

    /// The subject claim is not a usable email address.
    #[error("subject claim is not an email: {0}")]
    Subject(#[from] EmailError),
}

/// The signed-in user's identity, derived from the session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    /// Account email from the token's subject claim.
    pub email: Email,
    /// Display name: the local part of the email.
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
}

/// Decode a bearer token's payload into a [`UserIdentity`].
///
/// Projects the `sub` claim into an email/display-name pair; the display name
/// is the local part before the `@`.
///
/// # Errors
///
/// Returns [`TokenError`] if the token is not JWT-shaped, the payload is not
/// base64url JSON, or the subject claim is missing or not an email.
pub fn decode_identity(token: &str) -> Result<UserIdentity, TokenError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_)) if segments.next().is_none() => payload,
        _ => return Err(TokenError::MalformedStructure),
    };

    // Some issuers pad the segment; base64url in JWTs is unpadded
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    let claims: Claims = serde_json::from_slice(&bytes)?;

    let subject = claims
        .sub
        .filter(|s| !s.is_empty())
        .ok_or(TokenError::MissingSubject)?;

    let email = Email::parse(&subject)?;
    let name = email.local_part().to_owned();

    Ok(UserIdentity { email, name })
}
