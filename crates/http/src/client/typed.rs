//! Client for endpoints that require a bearer token

use super::ClientError;
use reqwest::{Client, header};

/// Client for authenticated endpoints. Cheap to clone; the token is fixed for
/// the lifetime of the value, so callers build one per validated credential.
#[derive(Clone)]
pub struct AuthenticatedTrackClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl std::fmt::Debug for AuthenticatedTrackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedTrackClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl AuthenticatedTrackClient {
    pub(crate) fn from_parts(client: Client, base_url: String, access_token: String) -> Self {
        Self {
            client,
            base_url,
            access_token,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The bearer token attached to every request
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Create a request builder with authentication
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, url)
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", self.access_token))
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        super::execute(request).await
    }
}
