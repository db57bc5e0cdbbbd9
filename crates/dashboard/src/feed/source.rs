//! List resources a feed can page through

use super::scroll::{CALL_LOG_SCROLL_THRESHOLD_PX, NOTIFICATION_SCROLL_THRESHOLD_PX};
use super::state::Page;
use async_trait::async_trait;
use calltrack_core::{CallLog, NotificationLog};
use calltrack_http::types::PageQuery;
use calltrack_http::{AuthenticatedTrackClient, ClientError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    CallLogs,
    Notifications,
}

impl FeedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CallLogs => "call_logs",
            Self::Notifications => "notifications",
        }
    }

    /// Distance from the bottom of the document that loads the next page
    pub fn default_scroll_threshold(self) -> f64 {
        match self {
            Self::CallLogs => CALL_LOG_SCROLL_THRESHOLD_PX,
            Self::Notifications => NOTIFICATION_SCROLL_THRESHOLD_PX,
        }
    }
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fetches one page of a paginated list with an authenticated client
#[async_trait]
pub trait FeedSource: Send + Sync {
    type Item: Send + Sync;

    fn kind(&self) -> FeedKind;

    async fn fetch_page(
        &self,
        client: &AuthenticatedTrackClient,
        query: PageQuery,
    ) -> Result<Page<Self::Item>, ClientError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CallLogSource;

#[async_trait]
impl FeedSource for CallLogSource {
    type Item = CallLog;

    fn kind(&self) -> FeedKind {
        FeedKind::CallLogs
    }

    async fn fetch_page(
        &self,
        client: &AuthenticatedTrackClient,
        query: PageQuery,
    ) -> Result<Page<CallLog>, ClientError> {
        let page = client.call_logs(query).await?;
        Ok(Page {
            items: page.logs,
            total: page.total,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationSource;

#[async_trait]
impl FeedSource for NotificationSource {
    type Item = NotificationLog;

    fn kind(&self) -> FeedKind {
        FeedKind::Notifications
    }

    async fn fetch_page(
        &self,
        client: &AuthenticatedTrackClient,
        query: PageQuery,
    ) -> Result<Page<NotificationLog>, ClientError> {
        let page = client.notifications(query).await?;
        Ok(Page {
            items: page.logs,
            total: page.total,
        })
    }
}
