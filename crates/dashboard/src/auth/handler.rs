//! Login, signup and logout against the dashboard API

use calltrack_core::store::{load_credentials, load_user, save_login};
use calltrack_core::{Session, SessionStore, UserProfile};
use calltrack_http::{ClientError, TrackClient};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owns the session lifecycle: writes credentials on login, wipes them on logout
#[derive(Clone)]
pub struct AuthHandler {
    client: TrackClient,
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for AuthHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHandler")
            .field("base_url", &self.client.base_url())
            .finish_non_exhaustive()
    }
}

impl AuthHandler {
    pub fn new(client: TrackClient, store: Arc<dyn SessionStore>) -> Self {
        Self { client, store }
    }

    /// Authenticate and persist the issued credential pair
    ///
    /// # Errors
    ///
    /// Returns the server's error, or [`ClientError::AuthenticationFailed`]
    /// when the response lacks a user or access token. Nothing is persisted
    /// on failure.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile, ClientError> {
        let response = self.client.login(username, password).await?;

        let (Some(user), Some(access_token)) = (
            response.user,
            response.access_token.filter(|token| !token.is_empty()),
        ) else {
            warn!(username = %username, "login response missing user or access token");
            return Err(ClientError::AuthenticationFailed(
                "Invalid response from server".into(),
            ));
        };

        save_login(
            self.store.as_ref(),
            &access_token,
            response.refresh_token.as_deref(),
            &user,
        )
        .await?;

        info!(user_id = %user.id, username = %user.username, "logged in");
        Ok(user)
    }

    /// Register a new account, returning the server's confirmation message
    pub async fn signup(&self, username: &str, password: &str) -> Result<String, ClientError> {
        let response = self.client.signup(username, password).await?;
        info!(username = %username, "account created");
        Ok(response
            .message
            .unwrap_or_else(|| "Signup successful".to_string()))
    }

    /// Revoke the session server-side if possible, then wipe local state.
    /// Only a failure to clear local state is reported.
    pub async fn logout(&self) -> Result<(), ClientError> {
        match load_credentials(self.store.as_ref()).await {
            Ok(Some(credentials)) => {
                let client = self.client.authenticate(credentials.access_token);
                if let Err(e) = client.logout().await {
                    warn!(error = %e, "server-side logout failed");
                }
            }
            Ok(None) => debug!("no stored token, skipping server-side logout"),
            Err(e) => warn!(error = %e, "could not read stored token for logout"),
        }

        self.store.clear().await?;
        info!("logged out");
        Ok(())
    }

    /// Session derived from local state only; token validity is the guard's job
    pub async fn session(&self) -> Session {
        match load_credentials(self.store.as_ref()).await {
            Ok(Some(_)) => {
                let user = load_user(self.store.as_ref()).await.unwrap_or_else(|e| {
                    warn!(error = %e, "could not read stored user");
                    None
                });
                Session::authenticated(user)
            }
            Ok(None) => Session::anonymous(),
            Err(e) => {
                warn!(error = %e, "could not read stored session");
                Session::anonymous()
            }
        }
    }
}
