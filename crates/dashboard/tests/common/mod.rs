//! Shared fixtures for dashboard integration tests

#![allow(dead_code)]

use calltrack_core::MemoryStore;
use calltrack_core::store::save_login;
use calltrack_dashboard::{Dashboard, DashboardConfig};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::MockServer;

pub use calltrack_core::test_support::{token_expiring_in, user};

/// `count` call log records numbered from `first`
pub fn call_logs(first: usize, count: usize) -> Value {
    let logs: Vec<Value> = (first..first + count)
        .map(|i| {
            json!({
                "_id": format!("c{i}"),
                "timestamp": "1700000000000",
                "name": format!("Caller {i}"),
                "phoneNumber": "+15550100",
                "duration": "42",
                "type": "INCOMING"
            })
        })
        .collect();
    json!({ "logs": logs })
}

pub fn notifications(first: usize, count: usize, total: Option<u64>) -> Value {
    let logs: Vec<Value> = (first..first + count)
        .map(|i| {
            json!({
                "_id": format!("n{i}"),
                "app": "com.whatsapp",
                "title": format!("Message {i}"),
                "text": "hello",
                "time": 1_700_000_000_000_i64
            })
        })
        .collect();
    match total {
        Some(total) => json!({ "logs": logs, "total": total }),
        None => json!({ "logs": logs }),
    }
}

/// Dashboard against `server` with a store holding `access` (and refresh token `r1`)
pub async fn dashboard(server: &MockServer, access: Option<&str>) -> (Dashboard, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    if let Some(access) = access {
        save_login(store.as_ref(), access, Some("r1"), &user())
            .await
            .unwrap();
    }
    let mut config = DashboardConfig::with_api_url(server.uri());
    config.catalog_url = server.uri();
    config.fetch_profile = false;
    let dashboard = Dashboard::new(config, store.clone()).unwrap();
    (dashboard, store)
}
