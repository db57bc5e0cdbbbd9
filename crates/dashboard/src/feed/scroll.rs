//! Scroll proximity check that drives pagination

/// Distance from the bottom, in pixels, that triggers the next call log page
pub const CALL_LOG_SCROLL_THRESHOLD_PX: f64 = 100.0;

/// Notifications start loading well before the end of the list
pub const NOTIFICATION_SCROLL_THRESHOLD_PX: f64 = 1000.0;

/// Snapshot of a document's scroll geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPosition {
    pub viewport_height: f64,
    pub scroll_top: f64,
    pub document_height: f64,
}

impl ScrollPosition {
    pub fn new(viewport_height: f64, scroll_top: f64, document_height: f64) -> Self {
        Self {
            viewport_height,
            scroll_top,
            document_height,
        }
    }

    /// Scrolled all the way down a document of the given height
    pub fn at_bottom(viewport_height: f64, document_height: f64) -> Self {
        Self::new(
            viewport_height,
            (document_height - viewport_height).max(0.0),
            document_height,
        )
    }

    /// True when the viewport's bottom edge is within `threshold` of the end
    pub fn is_near_bottom(&self, threshold: f64) -> bool {
        self.viewport_height + self.scroll_top >= self.document_height - threshold
    }
}
