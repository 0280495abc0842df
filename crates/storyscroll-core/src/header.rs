#![forbid(unsafe_code)]

//! Page header scrolled-state tracking.
//!
//! The site header switches to a compact, opaque style once the document has
//! scrolled past a small threshold.

use crate::config::HeaderConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderScrollState {
    config: HeaderConfig,
    scrolled: bool,
}

impl HeaderScrollState {
    #[must_use]
    pub fn new(config: HeaderConfig) -> Self {
        Self {
            config,
            scrolled: false,
        }
    }

    #[must_use]
    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    /// Update from the document scroll offset. Returns the new value if it
    /// changed; non-finite offsets are ignored.
    pub fn observe(&mut self, scroll_y: f64) -> Option<bool> {
        if !scroll_y.is_finite() {
            return None;
        }
        let next = scroll_y > self.config.scrolled_threshold_px;
        if next == self.scrolled {
            return None;
        }
        self.scrolled = next;
        Some(next)
    }
}
