#![forbid(unsafe_code)]

//! The pinned section navigator state machine.
//!
//! [`Navigator::update`] is the single per-frame entry point. It derives one
//! [`ScrollSample`] from the host measurement and feeds that same sample to
//! panel selection, pin control, and boundary handling in one synchronous
//! pass, so no two behaviours can disagree about the scroll position.
//!
//! # State machine
//!
//! ```text
//!            enter pin range                 progress crosses a slot
//!   Before ─────────────────▶ Pinned(0) ⇄ Pinned(1) ⇄ … ⇄ Pinned(last)
//!     ▲                          │                          │   ▲
//!     └──── scroll above top ────┘     auto-advance / past   │   │ snap-back
//!                                        the pin range      ▼   │
//!                                                          After
//! ```
//!
//! There is no terminal state; the machine is re-entrant for as long as the
//! navigator is mounted.
//!
//! # Invariants
//!
//! 1. `active_index < panel_count` after every update.
//! 2. Updating twice with identical input leaves identical state.
//! 3. At most one [`ScrollCommand`] is emitted per update.

use core::time::Duration;

use crate::boundary::{BoundaryAction, BoundaryHandler};
use crate::config::NavigatorConfig;
use crate::geometry::{ScrollMeasurement, ScrollSample};
use crate::panel::{Panel, PanelSet};
use crate::pin::{PinMode, is_pinned};
use crate::selector::select_panel;
use crate::transition::{PanelTransition, TransitionFrame};

/// Coarse position of the document relative to the story section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Above the section; it renders inline.
    #[default]
    Before,
    /// Inside the pin range with the given panel active.
    Pinned(usize),
    /// Past the pin range; it renders inline.
    After,
}

impl Phase {
    fn from_sample(sample: &ScrollSample, pinned: bool, active_index: usize) -> Self {
        if pinned {
            Self::Pinned(active_index)
        } else if sample.scroll_y < sample.section_top {
            Self::Before
        } else {
            Self::After
        }
    }
}

/// Fire-and-forget scroll request for the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollCommand {
    /// Smooth scroll the document to an absolute offset.
    SmoothScrollTo { top: f64 },
    /// Smooth scroll the section's next sibling into view.
    ScrollNextSectionIntoView,
}

impl From<BoundaryAction> for ScrollCommand {
    fn from(action: BoundaryAction) -> Self {
        match action {
            BoundaryAction::SnapBack { top } => Self::SmoothScrollTo { top },
            BoundaryAction::AutoAdvance => Self::ScrollNextSectionIntoView,
        }
    }
}

/// State that survives across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigatorState {
    pub active_index: usize,
    pub is_pinned: bool,
    pub last_scroll_y: f64,
    pub is_auto_advancing: bool,
    pub is_snapping_up: bool,
    pub snap_cooldown_active: bool,
    /// Progress of the most recent sample.
    pub progress: f64,
    pub phase: Phase,
}

impl Default for NavigatorState {
    fn default() -> Self {
        Self {
            active_index: 0,
            is_pinned: false,
            last_scroll_y: 0.0,
            is_auto_advancing: false,
            is_snapping_up: false,
            snap_cooldown_active: false,
            progress: 0.0,
            phase: Phase::Before,
        }
    }
}

impl NavigatorState {
    #[must_use]
    pub fn pin_mode(&self) -> PinMode {
        PinMode::from_pinned(self.is_pinned)
    }
}

/// Active panel change produced by one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelChange {
    pub from: usize,
    pub to: usize,
}

/// Everything one update decided.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameOutcome {
    /// `true` when the measurement was unusable and nothing changed.
    pub skipped: bool,
    pub panel_change: Option<PanelChange>,
    pub pin_changed: bool,
    pub command: Option<ScrollCommand>,
}

impl FrameOutcome {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    /// Whether the renderer has anything new to show.
    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.panel_change.is_some() || self.pin_changed
    }
}

/// One story scroll navigator instance.
///
/// Every latch and timer lives on the instance, so several navigators on one
/// page never interfere.
#[derive(Debug, Clone)]
pub struct Navigator {
    panels: PanelSet,
    config: NavigatorConfig,
    state: NavigatorState,
    boundary: BoundaryHandler,
    transition: PanelTransition,
}

impl Navigator {
    #[must_use]
    pub fn new(panels: PanelSet, config: NavigatorConfig) -> Self {
        Self {
            panels,
            transition: PanelTransition::new(config.transition, 0),
            config,
            state: NavigatorState::default(),
            boundary: BoundaryHandler::new(),
        }
    }

    /// Return to the freshly mounted state.
    pub fn reset(&mut self) {
        self.state = NavigatorState::default();
        self.boundary = BoundaryHandler::new();
        self.transition.settle(0);
    }

    #[must_use]
    pub fn state(&self) -> &NavigatorState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    #[must_use]
    pub fn panels(&self) -> &PanelSet {
        &self.panels
    }

    #[must_use]
    pub fn active_panel(&self) -> &Panel {
        // `active_index` is kept below `panels.len()` and the set is non-empty.
        &self.panels.as_slice()[self.state.active_index]
    }

    /// Panel poses for rendering at `now`.
    #[must_use]
    pub fn transition_frame(&self, now: Duration) -> TransitionFrame {
        self.transition.frame(now)
    }

    /// Run one frame of the state machine.
    ///
    /// `now` is the host's monotonic clock, used only for the snap cooldown
    /// and panel transitions.
    pub fn update(&mut self, measurement: ScrollMeasurement, now: Duration) -> FrameOutcome {
        if !measurement.is_finite() {
            tracing::warn!(
                target: "storyscroll.update",
                ?measurement,
                "non-finite measurement dropped"
            );
            return FrameOutcome::skipped();
        }

        let _span = tracing::debug_span!(
            "storyscroll.update",
            scroll_y = measurement.scroll_y,
            section_top = measurement.section_top,
        )
        .entered();

        let sample = ScrollSample::new(measurement, self.state.last_scroll_y);
        let progress = sample.progress();

        let next_index = select_panel(progress, self.panels.len());
        let panel_change = (next_index != self.state.active_index).then(|| PanelChange {
            from: self.state.active_index,
            to: next_index,
        });
        if let Some(change) = panel_change {
            self.transition.start(change.from, change.to, now);
            tracing::debug!(
                target: "storyscroll.panel",
                from = change.from,
                to = change.to,
                progress,
                "active panel changed"
            );
        }

        let pinned = is_pinned(&sample);
        let pin_changed = pinned != self.state.is_pinned;

        let action = self.boundary.evaluate(
            &sample,
            progress,
            next_index,
            self.panels.last_index(),
            now,
            &self.config,
        );

        self.state = NavigatorState {
            active_index: next_index,
            is_pinned: pinned,
            last_scroll_y: sample.scroll_y,
            is_auto_advancing: self.boundary.is_auto_advancing(),
            is_snapping_up: self.boundary.is_snapping_up(),
            snap_cooldown_active: self.boundary.cooldown_active(now),
            progress,
            phase: Phase::from_sample(&sample, pinned, next_index),
        };

        FrameOutcome {
            skipped: false,
            panel_change,
            pin_changed,
            command: action.map(ScrollCommand::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: f64 = 1000.0;
    const TOP: f64 = 2000.0;

    fn navigator(count: usize) -> Navigator {
        let panels = (0..count)
            .map(|i| Panel::new(format!("panel {i}"), "body"))
            .collect();
        Navigator::new(PanelSet::new(panels).unwrap(), NavigatorConfig::default())
    }

    fn at(scroll_y: f64) -> ScrollMeasurement {
        ScrollMeasurement {
            scroll_y,
            section_top: TOP,
            section_height: 4.0 * VIEWPORT,
            viewport_height: VIEWPORT,
            has_next_section: true,
        }
    }

    #[test]
    fn initial_state_is_before_unpinned() {
        let nav = navigator(4);
        assert_eq!(nav.state().active_index, 0);
        assert!(!nav.state().is_pinned);
        assert_eq!(nav.state().phase, Phase::Before);
        assert_eq!(nav.active_panel().title, "panel 0");
    }

    #[test]
    fn phases_follow_scroll_position() {
        let mut nav = navigator(4);
        nav.update(at(100.0), Duration::ZERO);
        assert_eq!(nav.state().phase, Phase::Before);
        nav.update(at(TOP), Duration::ZERO);
        assert_eq!(nav.state().phase, Phase::Pinned(0));
        nav.update(at(TOP + 1500.0), Duration::ZERO);
        assert_eq!(nav.state().phase, Phase::Pinned(2));
        nav.update(at(TOP + 5000.0), Duration::ZERO);
        assert_eq!(nav.state().phase, Phase::After);
        assert_eq!(nav.state().pin_mode(), PinMode::Inline);
    }

    #[test]
    fn panel_change_starts_transition() {
        let mut nav = navigator(4);
        let outcome = nav.update(at(TOP + 800.0), Duration::from_millis(50));
        assert_eq!(outcome.panel_change, Some(PanelChange { from: 0, to: 1 }));
        assert!(outcome.pin_changed);
        assert!(outcome.needs_render());
        let frame = nav.transition_frame(Duration::from_millis(50));
        assert_eq!(frame.exiting.map(|p| p.index), Some(0));
        assert_eq!(frame.entering.index, 1);
    }

    #[test]
    fn unchanged_index_emits_no_change() {
        let mut nav = navigator(4);
        nav.update(at(TOP + 100.0), Duration::ZERO);
        let outcome = nav.update(at(TOP + 200.0), Duration::ZERO);
        assert_eq!(outcome.panel_change, None);
        assert!(!outcome.pin_changed);
        assert!(!outcome.needs_render());
    }

    #[test]
    fn non_finite_measurement_is_noop() {
        let mut nav = navigator(4);
        nav.update(at(TOP + 1500.0), Duration::ZERO);
        let before = *nav.state();
        let outcome = nav.update(at(f64::NAN), Duration::ZERO);
        assert!(outcome.skipped);
        assert_eq!(*nav.state(), before);
    }

    #[test]
    fn reset_restores_mount_state() {
        let mut nav = navigator(4);
        nav.update(at(TOP + 2500.0), Duration::ZERO);
        nav.reset();
        assert_eq!(*nav.state(), NavigatorState::default());
        assert!(nav.transition_frame(Duration::ZERO).complete);
    }

    #[test]
    fn single_panel_never_changes() {
        let mut nav = navigator(1);
        for y in [0.0, TOP, TOP + 1500.0, TOP + 3000.0, TOP + 9000.0] {
            let outcome = nav.update(at(y), Duration::ZERO);
            assert_eq!(outcome.panel_change, None);
            assert_eq!(nav.state().active_index, 0);
        }
    }

    #[test]
    fn boundary_command_maps_to_scroll_command() {
        assert_eq!(
            ScrollCommand::from(BoundaryAction::SnapBack { top: 5.0 }),
            ScrollCommand::SmoothScrollTo { top: 5.0 }
        );
        assert_eq!(
            ScrollCommand::from(BoundaryAction::AutoAdvance),
            ScrollCommand::ScrollNextSectionIntoView
        );
    }
}
