//! Paginated log feeds

pub mod loader;
pub mod scroll;
pub mod source;
pub mod state;

pub use loader::{DEFAULT_PAGE_LIMIT, FeedLoader};
pub use scroll::ScrollPosition;
pub use source::{CallLogSource, FeedKind, FeedSource, NotificationSource};
pub use state::{Completion, FeedPhase, FeedState, Page, PageTag};

/// Feed over `/calllogs`
pub type CallLogFeed = FeedLoader<CallLogSource>;

/// Feed over `/notifications`
pub type NotificationFeed = FeedLoader<NotificationSource>;
