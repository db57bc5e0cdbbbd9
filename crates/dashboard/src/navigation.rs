//! Dashboard routes, header titles and the "back to listing" memory

use calltrack_core::{SessionStore, StoreKey};
use std::sync::Arc;
use tracing::warn;

pub const LOGIN_PATH: &str = "/login";
pub const CALL_LOGS_PATH: &str = "/dashboard";
pub const NOTIFICATIONS_PATH: &str = "/dashboard/customers";

/// Header title for a dashboard path
pub fn page_title(path: &str) -> &'static str {
    match path {
        CALL_LOGS_PATH => "Call Logs",
        NOTIFICATIONS_PATH => "Notifications",
        _ if path.contains("/product/") => "Call Logs",
        _ if path.contains("/customer/") => "Notifications",
        _ => "Dashboard",
    }
}

pub fn product_path(id: u64) -> String {
    format!("{CALL_LOGS_PATH}/product/{id}")
}

pub fn customer_path(id: u64) -> String {
    format!("{CALL_LOGS_PATH}/customer/{id}")
}

/// Remembers which listing a detail page was opened from
#[derive(Clone)]
pub struct Navigator {
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator").finish_non_exhaustive()
    }
}

impl Navigator {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Record `href` as the listing to return to, then hand it back for navigation
    pub async fn navigate<'a>(&self, href: &'a str) -> &'a str {
        if let Err(e) = self.store.set(StoreKey::LastListingPage, href).await {
            warn!(error = %e, href = %href, "could not remember listing page");
        }
        href
    }

    /// The remembered listing, or `default` when none is stored
    pub async fn back_to_listing(&self, default: &str) -> String {
        match self.store.get(StoreKey::LastListingPage).await {
            Ok(Some(href)) if !href.is_empty() => href,
            Ok(_) => default.to_string(),
            Err(e) => {
                warn!(error = %e, "could not read listing page");
                default.to_string()
            }
        }
    }
}
