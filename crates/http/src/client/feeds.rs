//! Paginated log feed client methods

use super::{AuthenticatedTrackClient, ClientError};
use crate::types::{LogPage, PageQuery};
use calltrack_core::{CallLog, NotificationLog};
use reqwest::Method;

impl AuthenticatedTrackClient {
    /// Fetch one page of call logs
    pub async fn call_logs(&self, page: PageQuery) -> Result<LogPage<CallLog>, ClientError> {
        let request = self.request(Method::GET, "/calllogs").query(&page);
        self.execute(request).await
    }

    /// Fetch one page of notifications; the first page carries `total`
    pub async fn notifications(
        &self,
        page: PageQuery,
    ) -> Result<LogPage<NotificationLog>, ClientError> {
        let request = self.request(Method::GET, "/notifications").query(&page);
        self.execute(request).await
    }
}
