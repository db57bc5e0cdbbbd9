//! Access/refresh credential pair and JWT expiry decoding
//!
//! Only the payload segment of the access token is inspected. Signature
//! verification is the server's concern; the client needs nothing more than
//! the `exp` claim to decide whether a refresh round-trip is due.

use crate::error::{CoreError, CoreResult};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The subset of JWT claims the client cares about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiration time (as UTC timestamp, seconds)
    pub exp: i64,
    /// Subject, when the issuer includes one
    #[serde(default)]
    pub sub: Option<String>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Decode the claims embedded in a JWT without verifying its signature
pub fn decode_claims(token: &str) -> CoreResult<TokenClaims> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_)) => payload,
        _ => return Err(CoreError::malformed_token("expected three segments")),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| CoreError::malformed_token(format!("payload is not base64url: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| CoreError::malformed_token(format!("payload is not valid claims: {e}")))
}

/// Access and refresh tokens held by the client session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Decoded from the access token; `None` when it cannot be decoded
    pub access_token_expiry: Option<DateTime<Utc>>,
}

impl CredentialPair {
    /// Build a pair, decoding the access token's expiry
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        let access_token = access_token.into();
        let access_token_expiry = decode_claims(&access_token)
            .ok()
            .and_then(|claims| claims.expires_at());
        Self {
            access_token,
            refresh_token,
            access_token_expiry,
        }
    }

    /// True when the access token stays valid for longer than `leeway` past `now`.
    /// Tokens with an undecodable expiry are never fresh.
    pub fn is_fresh_at(&self, now: DateTime<Utc>, leeway: Duration) -> bool {
        self.access_token_expiry
            .is_some_and(|expiry| now < expiry - leeway)
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }
}
