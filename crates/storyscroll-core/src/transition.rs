#![forbid(unsafe_code)]

//! Panel content transitions.
//!
//! When the active panel changes, the previous panel's exit and the next
//! panel's enter start at the same instant. Entering content fades in while
//! rising from `+offset_px` to rest; exiting content fades out while rising
//! from rest to `-offset_px`. Both use a cubic ease-out.
//!
//! # Invariants
//!
//! 1. Poses are pure functions of `(start, now)`: sampling never mutates.
//! 2. Opacity stays in `[0.0, 1.0]`; offsets stay between `0` and
//!    `±offset_px`.
//! 3. A change arriving mid-transition restarts from the new pair; the
//!    previous exit is dropped rather than queued.
//!
//! # Failure Modes
//!
//! - Zero duration: transitions complete immediately.
//! - `now` earlier than the start (host clock reset): treated as the start.

use core::time::Duration;

use crate::config::TransitionConfig;

/// Cubic ease-out on `t` in `[0, 1]`.
#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Render pose of one panel at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelPose {
    pub index: usize,
    pub opacity: f64,
    /// Vertical offset in pixels (positive = below rest).
    pub offset_y: f64,
}

impl PanelPose {
    #[must_use]
    pub fn at_rest(index: usize) -> Self {
        Self {
            index,
            opacity: 1.0,
            offset_y: 0.0,
        }
    }
}

/// Poses for every panel currently on stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionFrame {
    /// Outgoing panel, present only while its exit is running.
    pub exiting: Option<PanelPose>,
    pub entering: PanelPose,
    pub complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Running {
    from: usize,
    started_at: Duration,
}

/// Enter/exit orchestration for the active panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelTransition {
    config: TransitionConfig,
    current: usize,
    running: Option<Running>,
}

impl PanelTransition {
    /// A settled transition showing `index` at rest.
    #[must_use]
    pub fn new(config: TransitionConfig, index: usize) -> Self {
        Self {
            config,
            current: index,
            running: None,
        }
    }

    /// Begin exiting `from` and entering `to` at `now`.
    pub fn start(&mut self, from: usize, to: usize, now: Duration) {
        self.current = to;
        self.running = Some(Running {
            from,
            started_at: now,
        });
    }

    /// Jump straight to `index` with no animation.
    pub fn settle(&mut self, index: usize) {
        self.current = index;
        self.running = None;
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Eased progress of the running transition, `1.0` when settled.
    #[must_use]
    pub fn eased_progress(&self, now: Duration) -> f64 {
        let Some(running) = self.running else {
            return 1.0;
        };
        let duration = self.config.duration();
        if duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(running.started_at);
        ease_out_cubic(elapsed.as_secs_f64() / duration.as_secs_f64())
    }

    #[must_use]
    pub fn is_active(&self, now: Duration) -> bool {
        self.eased_progress(now) < 1.0
    }

    /// Sample panel poses at `now`.
    #[must_use]
    pub fn frame(&self, now: Duration) -> TransitionFrame {
        let eased = self.eased_progress(now);
        let offset = self.config.offset_px;
        let complete = eased >= 1.0;

        let exiting = match self.running {
            Some(running) if !complete => Some(PanelPose {
                index: running.from,
                opacity: 1.0 - eased,
                offset_y: -offset * eased,
            }),
            _ => None,
        };

        TransitionFrame {
            exiting,
            entering: PanelPose {
                index: self.current,
                opacity: eased,
                offset_y: offset * (1.0 - eased),
            },
            complete,
        }
    }
}
