#![forbid(unsafe_code)]

//! Pin control: fixed-in-viewport vs inline rendering.
//!
//! The section is pinned exactly while the scroll offset lies inside
//! [`ScrollSample::pin_range`]. Sections no taller than the viewport have no
//! pin range and are never pinned.

use crate::geometry::ScrollSample;

/// How the renderer should position the section's viewport-height stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinMode {
    /// Participates in normal document flow.
    #[default]
    Inline,
    /// Fixed to the top of the viewport, stacked above sibling content.
    Fixed,
}

impl PinMode {
    #[must_use]
    pub fn from_pinned(pinned: bool) -> Self {
        if pinned { Self::Fixed } else { Self::Inline }
    }

    #[must_use]
    pub fn is_fixed(self) -> bool {
        self == Self::Fixed
    }

    /// CSS `position` value for this mode.
    #[must_use]
    pub fn css_position(self) -> &'static str {
        match self {
            Self::Inline => "relative",
            Self::Fixed => "fixed",
        }
    }
}

/// Whether the section should be pinned for this sample.
#[must_use]
pub fn is_pinned(sample: &ScrollSample) -> bool {
    sample
        .pin_range()
        .is_some_and(|range| range.contains(&sample.scroll_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ScrollMeasurement;

    fn at(scroll_y: f64, height: f64) -> ScrollSample {
        ScrollSample::new(
            ScrollMeasurement {
                scroll_y,
                section_top: 500.0,
                section_height: height,
                viewport_height: 800.0,
                has_next_section: false,
            },
            scroll_y,
        )
    }

    #[test]
    fn pinned_inclusive_on_both_edges() {
        assert!(!is_pinned(&at(499.0, 3200.0)));
        assert!(is_pinned(&at(500.0, 3200.0)));
        assert!(is_pinned(&at(2900.0, 3200.0)));
        assert!(!is_pinned(&at(2900.5, 3200.0)));
    }

    #[test]
    fn short_section_never_pinned() {
        for y in [0.0, 500.0, 900.0] {
            assert!(!is_pinned(&at(y, 800.0)));
            assert!(!is_pinned(&at(y, 300.0)));
        }
    }

    #[test]
    fn pin_mode_css() {
        assert_eq!(PinMode::from_pinned(true).css_position(), "fixed");
        assert_eq!(PinMode::from_pinned(false).css_position(), "relative");
        assert!(PinMode::Fixed.is_fixed());
        assert_eq!(PinMode::default(), PinMode::Inline);
    }
}
