#![forbid(unsafe_code)]

//! Scroll geometry: host measurements, per-frame samples, and progress.
//!
//! A [`ScrollMeasurement`] is what the host reads from the platform once per
//! animation frame. Pairing it with the previous frame's scroll offset yields
//! a [`ScrollSample`], the single input every navigator behaviour consumes.
//!
//! # Invariants
//!
//! 1. [`max_scroll`] is always `>= 1.0`, so [`progress`] never divides by zero
//!    even when the section is shorter than the viewport.
//! 2. [`progress`] is clamped to `[0.0, 1.0]` and is monotonically
//!    non-decreasing in `scroll_y`.
//! 3. [`ScrollSample::pin_range`] is `None` whenever the section is not taller
//!    than the viewport.

use core::ops::RangeInclusive;

/// Lower bound for the scrollable distance through a section, in pixels.
pub const MIN_MAX_SCROLL: f64 = 1.0;

/// One raw reading of document and section geometry, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMeasurement {
    /// Current document scroll offset (`window.scrollY`).
    pub scroll_y: f64,
    /// Section top relative to the document.
    pub section_top: f64,
    /// Rendered section height.
    pub section_height: f64,
    /// Current viewport height.
    pub viewport_height: f64,
    /// Whether a next sibling section exists to auto-advance into.
    pub has_next_section: bool,
}

impl ScrollMeasurement {
    /// Build a measurement from a viewport-relative bounding rect top.
    ///
    /// The section's document offset is `scroll_y + rect_top`.
    #[must_use]
    pub fn from_client_rect(
        scroll_y: f64,
        rect_top: f64,
        section_height: f64,
        viewport_height: f64,
        has_next_section: bool,
    ) -> Self {
        Self {
            scroll_y,
            section_top: scroll_y + rect_top,
            section_height,
            viewport_height,
            has_next_section,
        }
    }

    /// Whether every coordinate is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.scroll_y.is_finite()
            && self.section_top.is_finite()
            && self.section_height.is_finite()
            && self.viewport_height.is_finite()
    }
}

/// Vertical scroll direction relative to the previous frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    /// Scroll offset decreased.
    Up,
    /// Scroll offset increased.
    Down,
    /// Scroll offset unchanged (resize, or a repeated frame).
    #[default]
    Still,
}

impl ScrollDirection {
    /// Direction of travel from `previous` to `current`.
    #[must_use]
    pub fn between(previous: f64, current: f64) -> Self {
        if current > previous {
            Self::Down
        } else if current < previous {
            Self::Up
        } else {
            Self::Still
        }
    }
}

/// The per-frame sample shared by every navigator behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    pub scroll_y: f64,
    pub section_top: f64,
    pub section_height: f64,
    pub viewport_height: f64,
    pub has_next_section: bool,
    pub direction: ScrollDirection,
}

impl ScrollSample {
    /// Derive a sample from a measurement and the previous frame's offset.
    #[must_use]
    pub fn new(measurement: ScrollMeasurement, last_scroll_y: f64) -> Self {
        Self {
            scroll_y: measurement.scroll_y,
            section_top: measurement.section_top,
            section_height: measurement.section_height,
            viewport_height: measurement.viewport_height,
            has_next_section: measurement.has_next_section,
            direction: ScrollDirection::between(last_scroll_y, measurement.scroll_y),
        }
    }

    #[must_use]
    pub fn scrolling_down(&self) -> bool {
        self.direction == ScrollDirection::Down
    }

    #[must_use]
    pub fn scrolling_up(&self) -> bool {
        self.direction == ScrollDirection::Up
    }

    /// Scrollable distance through the section, floored at [`MIN_MAX_SCROLL`].
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        max_scroll(self.section_height, self.viewport_height)
    }

    /// Document offset at which the pinned region ends.
    ///
    /// Lies above `section_top` for sections shorter than the viewport.
    #[must_use]
    pub fn pin_end(&self) -> f64 {
        self.section_top + self.section_height - self.viewport_height
    }

    /// Normalized progress through the section.
    #[must_use]
    pub fn progress(&self) -> f64 {
        progress(self.scroll_y, self.section_top, self.max_scroll())
    }

    /// Scroll offsets over which the section is pinned, if any.
    #[must_use]
    pub fn pin_range(&self) -> Option<RangeInclusive<f64>> {
        if self.section_height > self.viewport_height {
            Some(self.section_top..=self.pin_end())
        } else {
            None
        }
    }

    /// Whether the offset lies past the bottom of the pinned region.
    #[must_use]
    pub fn is_below_section(&self) -> bool {
        self.scroll_y > self.pin_end()
    }
}

/// Scrollable distance through a section of `section_height` in a viewport of
/// `viewport_height`, never less than [`MIN_MAX_SCROLL`].
#[must_use]
pub fn max_scroll(section_height: f64, viewport_height: f64) -> f64 {
    (section_height - viewport_height).max(MIN_MAX_SCROLL)
}

/// Normalized progress of `scroll_y` through a section starting at
/// `section_top`, clamped to `[0.0, 1.0]`.
///
/// A non-finite ratio collapses to `0.0`.
#[must_use]
pub fn progress(scroll_y: f64, section_top: f64, max_scroll: f64) -> f64 {
    let ratio = (scroll_y - section_top) / max_scroll.max(MIN_MAX_SCROLL);
    if ratio.is_nan() {
        return 0.0;
    }
    ratio.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(scroll_y: f64, height: f64, viewport: f64) -> ScrollSample {
        ScrollSample::new(
            ScrollMeasurement {
                scroll_y,
                section_top: 1000.0,
                section_height: height,
                viewport_height: viewport,
                has_next_section: true,
            },
            0.0,
        )
    }

    #[test]
    fn section_top_from_client_rect() {
        let m = ScrollMeasurement::from_client_rect(500.0, -120.0, 4000.0, 1000.0, false);
        assert_eq!(m.section_top, 380.0);
        assert!(!m.has_next_section);
    }

    #[test]
    fn direction_between_offsets() {
        assert_eq!(ScrollDirection::between(10.0, 20.0), ScrollDirection::Down);
        assert_eq!(ScrollDirection::between(20.0, 10.0), ScrollDirection::Up);
        assert_eq!(ScrollDirection::between(10.0, 10.0), ScrollDirection::Still);
    }

    #[test]
    fn max_scroll_floors_at_one() {
        assert_eq!(max_scroll(1000.0, 1000.0), 1.0);
        assert_eq!(max_scroll(400.0, 1000.0), 1.0);
        assert_eq!(max_scroll(4000.0, 1000.0), 3000.0);
    }

    #[test]
    fn progress_clamps_outside_section() {
        assert_eq!(sample(0.0, 4000.0, 1000.0).progress(), 0.0);
        assert_eq!(sample(1000.0, 4000.0, 1000.0).progress(), 0.0);
        assert_eq!(sample(2500.0, 4000.0, 1000.0).progress(), 0.5);
        assert_eq!(sample(4000.0, 4000.0, 1000.0).progress(), 1.0);
        assert_eq!(sample(9000.0, 4000.0, 1000.0).progress(), 1.0);
    }

    #[test]
    fn progress_degenerate_section_does_not_divide_by_zero() {
        let s = sample(1000.5, 1000.0, 1000.0);
        assert_eq!(s.max_scroll(), 1.0);
        assert_eq!(s.progress(), 0.5);
    }

    #[test]
    fn progress_nan_collapses_to_zero() {
        assert_eq!(progress(f64::NAN, 0.0, 10.0), 0.0);
    }

    #[test]
    fn pin_range_requires_tall_section() {
        assert_eq!(sample(0.0, 4000.0, 1000.0).pin_range(), Some(1000.0..=4000.0));
        assert_eq!(sample(0.0, 1000.0, 1000.0).pin_range(), None);
        assert_eq!(sample(0.0, 600.0, 1000.0).pin_range(), None);
    }

    #[test]
    fn non_finite_measurement_detected() {
        let mut m = ScrollMeasurement::from_client_rect(0.0, 0.0, 10.0, 10.0, true);
        assert!(m.is_finite());
        m.viewport_height = f64::INFINITY;
        assert!(!m.is_finite());
    }
}
