#![forbid(unsafe_code)]

//! Animation-frame coalescing for scroll and resize floods.
//!
//! Browsers can deliver dozens of scroll events between two rendered frames.
//! Recomputing on each one wastes work and can observe torn geometry, so
//! [`FrameScheduler`] keeps at most one animation frame outstanding:
//!
//! - The first notification after an idle period schedules a frame.
//! - Later notifications before that frame runs are coalesced (counted only).
//! - The frame callback is accepted once, for the outstanding handle only.
//!   Stale handles (already run or cancelled) are rejected.
//!
//! # Usage
//!
//! ```
//! use storyscroll_core::frame_scheduler::{FrameHandle, FrameScheduler};
//!
//! let mut scheduler = FrameScheduler::new();
//! let mut next_id = 0;
//! let mut raf = || { next_id += 1; FrameHandle(next_id) };
//!
//! assert!(scheduler.request(&mut raf));   // scroll: frame 1 scheduled
//! assert!(!scheduler.request(&mut raf));  // scroll: coalesced
//! assert!(!scheduler.request(&mut raf));  // resize: coalesced
//! assert_eq!(scheduler.coalesced_total(), 2);
//!
//! assert!(scheduler.take(FrameHandle(1)));   // frame fires: run update
//! assert!(!scheduler.take(FrameHandle(1)));  // duplicate callback ignored
//! ```

/// Host-assigned identifier of a scheduled animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Keeps at most one animation frame outstanding.
///
/// # Thread Safety
///
/// Not thread-safe; it lives on the UI thread next to the listeners that
/// feed it.
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    pending: Option<FrameHandle>,
    coalesced_total: u64,
    frames_run: u64,
}

impl FrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a scroll/resize notification.
    ///
    /// Calls `schedule` to obtain a new frame only when none is outstanding.
    /// Returns `true` if a frame was scheduled, `false` if coalesced.
    pub fn request(&mut self, schedule: impl FnOnce() -> FrameHandle) -> bool {
        if self.pending.is_some() {
            self.coalesced_total = self.coalesced_total.saturating_add(1);
            tracing::trace!(
                target: "storyscroll.frame",
                coalesced_total = self.coalesced_total,
                "notification coalesced"
            );
            return false;
        }
        let handle = schedule();
        self.pending = Some(handle);
        tracing::trace!(target: "storyscroll.frame", handle = handle.0, "frame scheduled");
        true
    }

    /// Accept the frame callback for `handle`.
    ///
    /// Returns `true` exactly once for the outstanding handle; the caller
    /// should then run its update.
    pub fn take(&mut self, handle: FrameHandle) -> bool {
        if self.pending != Some(handle) {
            tracing::trace!(target: "storyscroll.frame", handle = handle.0, "stale frame ignored");
            return false;
        }
        self.pending = None;
        self.frames_run = self.frames_run.saturating_add(1);
        true
    }

    /// Drop the outstanding frame, returning it so the host can cancel it.
    pub fn cancel(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    #[must_use]
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Notifications absorbed into an already scheduled frame.
    #[must_use]
    pub fn coalesced_total(&self) -> u64 {
        self.coalesced_total
    }

    /// Frame callbacks accepted via [`take`](Self::take).
    #[must_use]
    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }
}
