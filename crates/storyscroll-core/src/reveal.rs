#![forbid(unsafe_code)]

//! In-view tracking for reveal-on-scroll sections.
//!
//! Sections around the story scroll fade in when they first become visible.
//! [`InViewTracker`] reproduces that behaviour from plain geometry: the host
//! reports the element's viewport-relative top and height each frame, and
//! the tracker flips `in_view` when the visible fraction crosses the
//! configured threshold.
//!
//! With `trigger_once`, the tracker disconnects after the first reveal and
//! ignores all further samples.

use crate::config::RevealConfig;

/// Fraction of an element's height inside a viewport of `viewport_height`.
///
/// `element_top` is relative to the viewport top. A zero-height element
/// counts as fully visible while its top lies inside the viewport.
#[must_use]
pub fn visible_ratio(element_top: f64, element_height: f64, viewport_height: f64) -> f64 {
    if !(element_top.is_finite() && element_height.is_finite() && viewport_height.is_finite()) {
        return 0.0;
    }
    if element_height <= 0.0 {
        return if (0.0..=viewport_height).contains(&element_top) {
            1.0
        } else {
            0.0
        };
    }
    let visible_top = element_top.max(0.0);
    let visible_bottom = (element_top + element_height).min(viewport_height);
    ((visible_bottom - visible_top).max(0.0) / element_height).clamp(0.0, 1.0)
}

/// Tracks whether one element is in view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InViewTracker {
    config: RevealConfig,
    in_view: bool,
    disconnected: bool,
}

impl InViewTracker {
    #[must_use]
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            in_view: false,
            disconnected: false,
        }
    }

    #[must_use]
    pub fn in_view(&self) -> bool {
        self.in_view
    }

    /// Whether a trigger-once tracker has stopped observing.
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Feed a visible ratio. Returns the new `in_view` value if it changed.
    pub fn observe_ratio(&mut self, ratio: f64) -> Option<bool> {
        if self.disconnected {
            return None;
        }
        let intersecting = ratio > 0.0 && ratio >= self.config.threshold;
        let next = if intersecting {
            if self.config.trigger_once {
                self.disconnected = true;
            }
            true
        } else if self.config.trigger_once {
            self.in_view
        } else {
            false
        };

        if next == self.in_view {
            return None;
        }
        self.in_view = next;
        Some(next)
    }

    /// Feed element geometry. See [`visible_ratio`].
    pub fn observe(
        &mut self,
        element_top: f64,
        element_height: f64,
        viewport_height: f64,
    ) -> Option<bool> {
        self.observe_ratio(visible_ratio(element_top, element_height, viewport_height))
    }
}
