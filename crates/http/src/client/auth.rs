//! Authentication API client methods

use super::{AuthenticatedTrackClient, ClientError, TrackClient};
use crate::types::{
    CredentialsRequest, LoginResponse, RefreshRequest, RefreshResponse, SignupResponse,
};
use calltrack_core::UserProfile;
use reqwest::Method;

impl TrackClient {
    /// Exchange a username and password for a credential pair
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let request = self
            .request(Method::POST, "/auth/login")
            .json(&CredentialsRequest {
                username: username.to_string(),
                password: password.to_string(),
            });
        self.execute(request).await
    }

    /// Register a new dashboard account
    pub async fn signup(&self, username: &str, password: &str) -> Result<SignupResponse, ClientError> {
        let request = self
            .request(Method::POST, "/auth/signup")
            .json(&CredentialsRequest {
                username: username.to_string(),
                password: password.to_string(),
            });
        self.execute(request).await
    }

    /// Mint a new access token from a refresh token
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ClientError> {
        let request = self
            .request(Method::POST, "/auth/refresh")
            .json(&RefreshRequest {
                refresh_token: refresh_token.to_string(),
            });
        self.execute(request).await
    }
}

impl AuthenticatedTrackClient {
    /// Get the profile of the token's owner
    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        let request = self.request(Method::GET, "/auth/me");
        self.execute(request).await
    }

    /// Revoke the session server-side. The response body is ignored.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self.request(Method::POST, "/auth/logout").send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::from_status(status, message))
        }
    }
}
