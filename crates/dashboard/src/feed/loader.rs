//! Scroll-driven feed loader
//!
//! Owns a [`FeedState`] and performs the fetches it asks for. Each fetch
//! resolves a credential through the session guard first; a missing
//! credential fails the page without sending a request.

use super::scroll::ScrollPosition;
use super::source::FeedSource;
use super::state::{Completion, FeedState, Page, PageTag};
use crate::auth::SessionGuard;
use calltrack_http::ClientError;
use calltrack_http::types::PageQuery;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Default number of items per page
pub const DEFAULT_PAGE_LIMIT: usize = 12;

pub struct FeedLoader<S: FeedSource> {
    source: S,
    guard: SessionGuard,
    state: FeedState<S::Item>,
    scroll_threshold: f64,
    cancel: CancellationToken,
}

impl<S: FeedSource> std::fmt::Debug for FeedLoader<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedLoader")
            .field("kind", &self.source.kind())
            .field("phase", &self.state.phase())
            .field("items", &self.state.items().len())
            .field("next_skip", &self.state.next_skip())
            .finish_non_exhaustive()
    }
}

impl<S: FeedSource> FeedLoader<S> {
    /// Loader using the source's default scroll threshold
    pub fn new(source: S, guard: SessionGuard) -> Self {
        let scroll_threshold = source.kind().default_scroll_threshold();
        Self {
            source,
            guard,
            state: FeedState::new(DEFAULT_PAGE_LIMIT),
            scroll_threshold,
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.state = FeedState::new(limit.max(1));
        self
    }

    #[must_use]
    pub fn with_scroll_threshold(mut self, threshold: f64) -> Self {
        self.scroll_threshold = threshold;
        self
    }

    pub fn scroll_threshold(&self) -> f64 {
        self.scroll_threshold
    }

    pub fn state(&self) -> &FeedState<S::Item> {
        &self.state
    }

    pub fn items(&self) -> &[S::Item] {
        self.state.items()
    }

    pub fn has_more(&self) -> bool {
        self.state.has_more()
    }

    /// Token cancelled by [`Self::unmount`]. Cancelling it directly aborts the
    /// fetch in flight from another task.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_unmounted(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Load the first page, replacing whatever the feed holds
    pub async fn mount(&mut self) -> Completion {
        info!(feed = %self.source.kind(), limit = self.state.limit(), "mounting feed");
        let tag = self.state.begin_initial();
        self.run(tag).await
    }

    /// Load the next page if the position is within the scroll threshold.
    /// Returns `None` when no fetch was started.
    pub async fn on_scroll(&mut self, position: ScrollPosition) -> Option<Completion> {
        if !position.is_near_bottom(self.scroll_threshold) {
            return None;
        }
        self.load_more().await
    }

    /// Load the next page unless one is in flight or the feed is exhausted
    pub async fn load_more(&mut self) -> Option<Completion> {
        if self.is_unmounted() {
            return None;
        }
        let Some(tag) = self.state.begin_next() else {
            debug!(feed = %self.source.kind(), phase = ?self.state.phase(), "no page to load");
            return None;
        };
        Some(self.run(tag).await)
    }

    /// Abandon the fetch in flight and stop loading
    pub fn unmount(&mut self) {
        info!(feed = %self.source.kind(), "unmounting feed");
        self.cancel.cancel();
        self.state.cancel();
    }

    async fn run(&mut self, tag: PageTag) -> Completion {
        let result = self.fetch(tag).await;
        if self.cancel.is_cancelled() {
            debug!(feed = %self.source.kind(), skip = tag.skip, "fetch cancelled");
            self.state.cancel();
            return Completion::Cancelled;
        }
        self.state.complete(tag, result)
    }

    async fn fetch(&self, tag: PageTag) -> Result<Page<S::Item>, ClientError> {
        let query = PageQuery {
            limit: self.state.limit(),
            skip: tag.skip,
        };

        let work = async {
            let token = self.guard.resolve().await.inspect_err(|e| {
                error!(feed = %self.source.kind(), error = %e, "no credential for page fetch");
            })?;
            let client = self.guard.client().authenticate(token);
            debug!(feed = %self.source.kind(), skip = query.skip, limit = query.limit, "fetching page");
            self.source.fetch_page(&client, query).await
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(ClientError::Cancelled),
            result = work => result,
        }
    }
}
