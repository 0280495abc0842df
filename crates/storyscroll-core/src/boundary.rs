#![forbid(unsafe_code)]

//! Boundary handling: upward snap-back and downward auto-advance.
//!
//! Two one-shot triggers, each guarded by its own latch:
//!
//! - **Snap-back** fires when the user scrolls upward while inside the trigger
//!   zone just below the pinned region (`pin_end < scroll_y <= pin_end +
//!   snap_back_threshold_px`). It requests a smooth scroll to the section top
//!   and starts a cooldown during which no further snap may fire.
//! - **Auto-advance** fires when the last panel is active, progress has
//!   reached `auto_advance_progress`, and the user scrolls downward. It
//!   requests that the next sibling section be scrolled into view.
//!
//! # Invariants
//!
//! 1. At most one action fires per sample: snap-back requires an upward
//!    sample, auto-advance a downward one.
//! 2. A latch only clears on a real signal change. The snap latch clears once
//!    the offset leaves the trigger zone or the user scrolls downward; the
//!    advance latch clears once progress drops below the threshold or the
//!    user scrolls upward. A [`ScrollDirection::Still`] sample holds both.
//! 3. Cooldown expiry is judged against the host clock passed in, so repeated
//!    evaluation with identical input yields identical state.
//!
//! # Failure Modes
//!
//! - No next section: auto-advance is skipped and its latch stays clear, so
//!   it can fire if a sibling appears later.
//! - Programmatic scroll interrupted by the user: nothing to undo, every
//!   decision is re-derived from the next sample.

use core::time::Duration;

use crate::config::NavigatorConfig;
use crate::geometry::{ScrollDirection, ScrollSample};

/// A programmatic scroll requested by the boundary handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryAction {
    /// Smooth scroll the document to `top` (the section start).
    SnapBack { top: f64 },
    /// Smooth scroll the next sibling section into view.
    AutoAdvance,
}

/// Latches and cooldown for the two boundary triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundaryHandler {
    snapping_up: bool,
    auto_advancing: bool,
    cooldown_until: Option<Duration>,
}

impl BoundaryHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_snapping_up(&self) -> bool {
        self.snapping_up
    }

    #[must_use]
    pub fn is_auto_advancing(&self) -> bool {
        self.auto_advancing
    }

    /// Whether a snap cooldown is still running at `now`.
    #[must_use]
    pub fn cooldown_active(&self, now: Duration) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    /// Evaluate both triggers for one sample.
    ///
    /// `active_index` and `progress` must come from the same sample.
    pub fn evaluate(
        &mut self,
        sample: &ScrollSample,
        progress: f64,
        active_index: usize,
        last_index: usize,
        now: Duration,
        config: &NavigatorConfig,
    ) -> Option<BoundaryAction> {
        if !self.cooldown_active(now) {
            self.cooldown_until = None;
        }

        let snap = self.evaluate_snap_back(sample, now, config);
        let advance = self.evaluate_auto_advance(sample, progress, active_index, last_index, config);
        debug_assert!(
            !(snap.is_some() && advance.is_some()),
            "snap-back and auto-advance fired from one sample"
        );
        snap.or(advance)
    }

    fn evaluate_snap_back(
        &mut self,
        sample: &ScrollSample,
        now: Duration,
        config: &NavigatorConfig,
    ) -> Option<BoundaryAction> {
        let zone_end = sample.pin_end() + config.snap_back_threshold_px;
        let in_zone = sample.is_below_section() && sample.scroll_y <= zone_end;

        match sample.direction {
            ScrollDirection::Down => {
                self.snapping_up = false;
                None
            }
            _ if !in_zone => {
                self.snapping_up = false;
                None
            }
            ScrollDirection::Still => None,
            ScrollDirection::Up => {
                if self.snapping_up || self.cooldown_until.is_some() {
                    return None;
                }
                self.snapping_up = true;
                self.cooldown_until = Some(now.saturating_add(config.snap_cooldown()));
                tracing::debug!(
                    target: "storyscroll.boundary",
                    scroll_y = sample.scroll_y,
                    section_top = sample.section_top,
                    cooldown_ms = config.snap_cooldown_ms,
                    "snap-back fired"
                );
                Some(BoundaryAction::SnapBack {
                    top: sample.section_top,
                })
            }
        }
    }

    fn evaluate_auto_advance(
        &mut self,
        sample: &ScrollSample,
        progress: f64,
        active_index: usize,
        last_index: usize,
        config: &NavigatorConfig,
    ) -> Option<BoundaryAction> {
        let past_threshold = progress >= config.auto_advance_progress;
        let at_end = active_index == last_index && past_threshold;

        if at_end && sample.scrolling_down() {
            if self.auto_advancing || !sample.has_next_section {
                return None;
            }
            self.auto_advancing = true;
            tracing::debug!(
                target: "storyscroll.boundary",
                progress,
                scroll_y = sample.scroll_y,
                "auto-advance fired"
            );
            return Some(BoundaryAction::AutoAdvance);
        }

        if sample.scrolling_up() || !past_threshold {
            self.auto_advancing = false;
        }
        None
    }
}
