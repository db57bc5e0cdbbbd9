//! Calltrack HTTP client

pub mod auth;
pub mod catalog;
pub mod error;
pub mod feeds;
pub mod typed;

pub use typed::AuthenticatedTrackClient;

use error::ClientError;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("calltrack-client/", env!("CARGO_PKG_VERSION"));

/// Client for the public (unauthenticated) half of an API
#[derive(Clone, Debug)]
pub struct TrackClient {
    client: Client,
    base_url: String,
}

impl TrackClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> TrackClientBuilder {
        TrackClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder without authentication
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        execute(request).await
    }

    /// Attach a bearer token, producing a client for protected endpoints
    pub fn authenticate(&self, access_token: impl Into<String>) -> AuthenticatedTrackClient {
        AuthenticatedTrackClient::from_parts(
            self.client.clone(),
            self.base_url.clone(),
            access_token.into(),
        )
    }
}

/// Send a request, decoding a JSON body on success and mapping the status otherwise
pub(crate) async fn execute<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, ClientError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        Ok(response.json().await?)
    } else {
        let message = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "request returned error status");
        Err(ClientError::from_status(status, message))
    }
}

/// Builder for TrackClient
#[derive(Default)]
pub struct TrackClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl TrackClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<TrackClient, ClientError> {
        let base_url = self
            .base_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new()
            .user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT));

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build()?;

        Ok(TrackClient { client, base_url })
    }
}
