//! Pagination state for one mounted feed
//!
//! Pure bookkeeping with no I/O. Every fetch is described by a [`PageTag`];
//! only the completion matching the outstanding tag may change the state.

use calltrack_http::ClientError;
use tracing::{debug, warn};

/// Identifies one page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageTag {
    pub generation: u64,
    pub skip: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Idle,
    Loading(PageTag),
    /// The server returned a short page; no further fetches
    Exhausted,
}

/// One fetched page
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: Option<u64>,
}

/// Outcome of [`FeedState::complete`]
#[derive(Debug)]
pub enum Completion {
    /// Items were merged; carries how many arrived
    Applied { received: usize },
    /// The tag was not the outstanding request; nothing changed
    Stale,
    /// The fetch failed; the next scroll retries the same page
    Failed(ClientError),
    /// The fetch was abandoned on unmount
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct FeedState<T> {
    items: Vec<T>,
    limit: usize,
    next_skip: usize,
    has_more: bool,
    phase: FeedPhase,
    total: Option<u64>,
    generation: u64,
    pages_loaded: usize,
}

impl<T> FeedState<T> {
    pub fn new(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            limit,
            next_skip: 0,
            has_more: true,
            phase: FeedPhase::Idle,
            total: None,
            generation: 0,
            pages_loaded: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Offset the next page request will use
    pub fn next_skip(&self) -> usize {
        self.next_skip
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, FeedPhase::Loading(_))
    }

    /// Total reported with the first page, for feeds that report one
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    /// Start over from the first page. Any request still in flight becomes stale.
    pub fn begin_initial(&mut self) -> PageTag {
        self.generation += 1;
        self.next_skip = 0;
        self.has_more = true;
        self.pages_loaded = 0;
        let tag = PageTag {
            generation: self.generation,
            skip: 0,
        };
        self.phase = FeedPhase::Loading(tag);
        tag
    }

    /// Start the next page, unless a fetch is outstanding or the feed is done
    pub fn begin_next(&mut self) -> Option<PageTag> {
        if self.phase != FeedPhase::Idle || !self.has_more {
            return None;
        }
        let tag = PageTag {
            generation: self.generation,
            skip: self.next_skip,
        };
        self.phase = FeedPhase::Loading(tag);
        Some(tag)
    }

    /// Apply the result of the request identified by `tag`
    pub fn complete(&mut self, tag: PageTag, result: Result<Page<T>, ClientError>) -> Completion {
        if self.phase != FeedPhase::Loading(tag) {
            debug!(?tag, phase = ?self.phase, "discarding stale page");
            return Completion::Stale;
        }

        let page = match result {
            Ok(page) => page,
            Err(ClientError::Cancelled) => {
                self.phase = FeedPhase::Idle;
                return Completion::Cancelled;
            }
            Err(e) => {
                warn!(error = %e, skip = tag.skip, "page fetch failed");
                self.phase = FeedPhase::Idle;
                return Completion::Failed(e);
            }
        };

        let received = page.items.len();
        if tag.skip == 0 {
            self.items = page.items;
            self.total = page.total;
        } else {
            self.items.extend(page.items);
        }
        self.has_more = received == self.limit;
        self.next_skip = tag.skip + self.limit;
        self.pages_loaded += 1;

        self.phase = if !self.has_more && !self.items.is_empty() {
            FeedPhase::Exhausted
        } else {
            FeedPhase::Idle
        };
        debug!(
            skip = tag.skip,
            received,
            accumulated = self.items.len(),
            has_more = self.has_more,
            "page applied"
        );
        Completion::Applied { received }
    }

    /// Abandon any outstanding request
    pub fn cancel(&mut self) {
        self.generation += 1;
        if self.is_loading() {
            self.phase = FeedPhase::Idle;
        }
    }
}
