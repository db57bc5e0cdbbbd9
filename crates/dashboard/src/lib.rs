//! Calltrack dashboard client
//!
//! Session guard with single-flight token refresh, the protected route gate,
//! and scroll-driven paginated feeds over the dashboard API.

pub mod auth;
pub mod config;
pub mod feed;
pub mod navigation;

pub use auth::{AuthHandler, GateState, RouteGate, SessionGuard};
pub use config::DashboardConfig;
pub use feed::{CallLogFeed, FeedLoader, NotificationFeed, ScrollPosition};
pub use navigation::Navigator;

use calltrack_core::{Customer, Product, SessionStore};
use calltrack_http::{ClientError, TrackClient};
use feed::{CallLogSource, NotificationSource};
use std::sync::Arc;

/// Wires configuration, HTTP clients and a session store together
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: DashboardConfig,
    guard: SessionGuard,
    auth: AuthHandler,
    navigator: Navigator,
    catalog: TrackClient,
}

impl Dashboard {
    /// Build the dashboard services over `store`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] when a base URL is empty
    pub fn new(config: DashboardConfig, store: Arc<dyn SessionStore>) -> Result<Self, ClientError> {
        let api = TrackClient::builder()
            .base_url(&config.api_url)
            .timeout(config.timeout())
            .build()?;
        let catalog = TrackClient::builder()
            .base_url(&config.catalog_url)
            .timeout(config.timeout())
            .build()?;

        let guard = SessionGuard::new(api.clone(), Arc::clone(&store))
            .with_leeway(config.refresh_leeway());
        let auth = AuthHandler::new(api, Arc::clone(&store));
        let navigator = Navigator::new(store);

        Ok(Self {
            config,
            guard,
            auth,
            navigator,
            catalog,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn auth(&self) -> &AuthHandler {
        &self.auth
    }

    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// A fresh gate for one protected view
    pub fn route_gate(&self) -> RouteGate {
        RouteGate::new(self.guard.clone()).with_profile_fetch(self.config.fetch_profile)
    }

    pub fn call_log_feed(&self) -> CallLogFeed {
        FeedLoader::new(CallLogSource, self.guard.clone())
            .with_page_limit(self.config.page_limit)
            .with_scroll_threshold(self.config.call_log_scroll_threshold_px)
    }

    pub fn notification_feed(&self) -> NotificationFeed {
        FeedLoader::new(NotificationSource, self.guard.clone())
            .with_page_limit(self.config.page_limit)
            .with_scroll_threshold(self.config.notification_scroll_threshold_px)
    }

    pub async fn product(&self, id: u64) -> Result<Product, ClientError> {
        self.catalog.product(id).await
    }

    pub async fn customer(&self, id: u64) -> Result<Customer, ClientError> {
        self.catalog.customer(id).await
    }
}
