//! Session guard: produce a currently-valid access token or report that the
//! user must sign in again.
//!
//! The fast path never touches the network. Tokens that are expired, expiring
//! within the leeway, or undecodable go through a refresh round-trip, and
//! concurrent callers needing a refresh share a single in-flight request.

use calltrack_core::store::load_credentials;
use calltrack_core::{SessionStore, StoreKey};
use calltrack_http::{ClientError, TrackClient};
use chrono::{Duration, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Default window before expiry in which a token is refreshed
pub const DEFAULT_REFRESH_LEEWAY_SECS: i64 = 60;

type PendingRefresh = Shared<BoxFuture<'static, Option<String>>>;

/// Validates and refreshes the persisted access token
#[derive(Clone)]
pub struct SessionGuard {
    client: TrackClient,
    store: Arc<dyn SessionStore>,
    leeway: Duration,
    pending: Arc<Mutex<Option<PendingRefresh>>>,
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard")
            .field("base_url", &self.client.base_url())
            .field("leeway", &self.leeway)
            .finish_non_exhaustive()
    }
}

impl SessionGuard {
    pub fn new(client: TrackClient, store: Arc<dyn SessionStore>) -> Self {
        Self {
            client,
            store,
            leeway: Duration::seconds(DEFAULT_REFRESH_LEEWAY_SECS),
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Override the refresh leeway
    #[must_use]
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn client(&self) -> &TrackClient {
        &self.client
    }

    /// A valid access token, or `None` when the caller must redirect to login
    pub async fn get_valid_credential(&self) -> Option<String> {
        self.resolve().await.ok()
    }

    /// Like [`Self::get_valid_credential`] but reports why no token is available:
    /// [`ClientError::AuthAbsent`] when nothing usable is stored,
    /// [`ClientError::AuthExpiredUnrecoverable`] when the refresh failed.
    pub async fn resolve(&self) -> Result<String, ClientError> {
        let credentials = match load_credentials(self.store.as_ref()).await {
            Ok(Some(credentials)) => credentials,
            Ok(None) => {
                debug!("no access token stored");
                return Err(ClientError::AuthAbsent);
            }
            Err(e) => {
                error!(error = %e, "failed to read stored credentials");
                return Err(ClientError::AuthAbsent);
            }
        };

        if credentials.is_fresh_at(Utc::now(), self.leeway) {
            debug!("access token still valid");
            return Ok(credentials.access_token);
        }

        if !credentials.has_refresh_token() {
            info!("access token expired and no refresh token stored");
            return Err(ClientError::AuthAbsent);
        }

        self.refresh_shared()
            .await
            .ok_or(ClientError::AuthExpiredUnrecoverable)
    }

    /// Join the in-flight refresh, or start one if none is pending
    async fn refresh_shared(&self) -> Option<String> {
        let pending = {
            let mut slot = self.pending.lock().await;
            if let Some(pending) = slot.as_ref() {
                debug!("joining in-flight token refresh");
                pending.clone()
            } else {
                // A refresh that finished while we waited for the slot may
                // already have stored a fresh token.
                let credentials = match load_credentials(self.store.as_ref()).await {
                    Ok(Some(credentials)) => credentials,
                    Ok(None) => return None,
                    Err(e) => {
                        error!(error = %e, "failed to re-read stored credentials");
                        return None;
                    }
                };
                if credentials.is_fresh_at(Utc::now(), self.leeway) {
                    return Some(credentials.access_token);
                }
                let refresh_token = credentials.refresh_token.filter(|token| !token.is_empty())?;

                let pending = refresh_round_trip(
                    self.client.clone(),
                    Arc::clone(&self.store),
                    refresh_token,
                )
                .boxed()
                .shared();
                *slot = Some(pending.clone());
                pending
            }
        };

        let result = pending.clone().await;

        let mut slot = self.pending.lock().await;
        if slot.as_ref().is_some_and(|current| current.ptr_eq(&pending)) {
            *slot = None;
        }
        result
    }

    /// Wipe every persisted session key
    pub async fn clear_session(&self) {
        if let Err(e) = self.store.clear().await {
            error!(error = %e, "failed to clear session state");
        }
    }
}

/// Exchange the refresh token; on any failure the whole session is wiped
async fn refresh_round_trip(
    client: TrackClient,
    store: Arc<dyn SessionStore>,
    refresh_token: String,
) -> Option<String> {
    info!("refreshing access token");

    let failure = match client.refresh(&refresh_token).await {
        Ok(response) if !response.access_token.is_empty() => {
            if let Err(e) = store
                .set(StoreKey::AccessToken, &response.access_token)
                .await
            {
                warn!(error = %e, "refreshed access token could not be persisted");
            }
            info!("access token refreshed");
            return Some(response.access_token);
        }
        Ok(_) => "refresh response carried an empty access token".to_string(),
        Err(e) => e.to_string(),
    };

    error!(error = %failure, "token refresh failed, clearing session");
    if let Err(e) = store.clear().await {
        error!(error = %e, "failed to clear session after refresh failure");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use calltrack_core::test_support::{token_expiring_in, user};
    use calltrack_core::MemoryStore;
    use calltrack_core::store::{mock::MockSessionStore, save_login};
    use calltrack_core::CoreError;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn guard_with(
        server: &MockServer,
        access: &str,
        refresh: Option<&str>,
    ) -> (SessionGuard, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        save_login(store.as_ref(), access, refresh, &user())
            .await
            .unwrap();
        store
            .set(StoreKey::LastListingPage, "/dashboard/call-logs")
            .await
            .unwrap();
        let client = TrackClient::new(server.uri()).unwrap();
        (SessionGuard::new(client, store.clone()), store)
    }

    #[tokio::test]
    async fn test_fresh_token_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let token = token_expiring_in(Duration::minutes(15));
        let (guard, _store) = guard_with(&server, &token, Some("r1")).await;

        assert_eq!(guard.get_valid_credential().await, Some(token));
    }

    #[tokio::test]
    async fn test_expiring_token_refreshes_once() {
        let server = MockServer::start().await;
        let new_token = token_expiring_in(Duration::minutes(15));
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .and(body_json(json!({"refreshToken": "r1"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"accessToken": new_token})),
            )
            .expect(1)
            .mount(&server)
            .await;

        // Within the 60 second leeway
        let token = token_expiring_in(Duration::seconds(30));
        let (guard, store) = guard_with(&server, &token, Some("r1")).await;

        assert_eq!(guard.get_valid_credential().await, Some(new_token.clone()));
        assert_eq!(
            store.get(StoreKey::AccessToken).await.unwrap(),
            Some(new_token.clone())
        );
        // The refreshed token is now on the fast path
        assert_eq!(guard.get_valid_credential().await, Some(new_token));
    }

    #[tokio::test]
    async fn test_refresh_failure_wipes_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(json!({"message": "revoked"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let token = token_expiring_in(Duration::minutes(-5));
        let (guard, store) = guard_with(&server, &token, Some("r1")).await;

        assert!(matches!(
            guard.resolve().await,
            Err(ClientError::AuthExpiredUnrecoverable)
        ));
        for key in StoreKey::ALL {
            assert!(store.get(key).await.unwrap().is_none(), "{key} survived");
        }
    }

    #[tokio::test]
    async fn test_network_error_is_terminal() {
        // Nothing listens on the reserved port
        let store = Arc::new(MemoryStore::new());
        let token = token_expiring_in(Duration::minutes(-5));
        save_login(store.as_ref(), &token, Some("r1"), &user())
            .await
            .unwrap();
        let client = TrackClient::new("http://127.0.0.1:9").unwrap();
        let guard = SessionGuard::new(client, store.clone());

        assert_eq!(guard.get_valid_credential().await, None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_missing_tokens_are_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = TrackClient::new(server.uri()).unwrap();
        let empty = SessionGuard::new(client, Arc::new(MemoryStore::new()));
        assert!(matches!(empty.resolve().await, Err(ClientError::AuthAbsent)));

        let expired = token_expiring_in(Duration::minutes(-1));
        let (guard, store) = guard_with(&server, &expired, None).await;
        assert!(matches!(guard.resolve().await, Err(ClientError::AuthAbsent)));
        // Absent without refresh leaves storage for the route gate to clear
        assert!(store.get(StoreKey::AccessToken).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let server = MockServer::start().await;
        let new_token = token_expiring_in(Duration::minutes(15));
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"accessToken": new_token}))
                    .set_delay(std::time::Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let token = token_expiring_in(Duration::minutes(-5));
        let (guard, _store) = guard_with(&server, &token, Some("r1")).await;

        let results = futures::future::join_all(
            (0..5).map(|_| {
                let guard = guard.clone();
                async move { guard.get_valid_credential().await }
            }),
        )
        .await;

        assert!(results.iter().all(|r| r.as_deref() == Some(new_token.as_str())));
        assert!(guard.pending.lock().await.is_none());
    }

    #[tokio::test]
    async fn test_store_read_failure_reads_as_absent() {
        let mut store = MockSessionStore::new();
        store
            .expect_get()
            .returning(|_| Err(CoreError::storage("locked")));
        let client = TrackClient::new("http://127.0.0.1:9").unwrap();
        let guard = SessionGuard::new(client, Arc::new(store));

        assert!(matches!(guard.resolve().await, Err(ClientError::AuthAbsent)));
    }
}
