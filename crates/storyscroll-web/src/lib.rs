#![forbid(unsafe_code)]

//! `storyscroll-web` connects the navigator to a browser-like host.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (JS or a test) pushes
//!   section measurements and scroll/resize notifications.
//! - **Deterministic time**: the host advances a monotonic clock explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! [`StoryScrollRunner`] owns the listener lifecycle. Scroll and resize
//! notifications are coalesced into at most one pending animation frame; the
//! frame callback measures the section, runs [`Navigator::update`], and hands
//! any resulting scroll command to the [`ScrollHost`].
//!
//! This crate does not bind to `wasm-bindgen`; `storyscroll-wasm` wraps it
//! with a JS API.

pub mod session_record;

use core::time::Duration;
use std::collections::VecDeque;

use storyscroll_core::frame_scheduler::{FrameHandle, FrameScheduler};
use storyscroll_core::header::HeaderScrollState;
use storyscroll_core::pin::PinMode;
use storyscroll_core::reveal::InViewTracker;
use storyscroll_core::transition::TransitionFrame;
use storyscroll_core::{
    FrameOutcome, Navigator, NavigatorConfig, NavigatorState, Panel, PanelSet, Phase,
    ScrollCommand, ScrollMeasurement, StoryConfig, config::ConfigError,
};

/// Web adapter error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebError {
    /// `mount` was called on a runner that is already listening.
    AlreadyMounted,
}

impl core::fmt::Display for WebError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AlreadyMounted => write!(f, "runner is already mounted"),
        }
    }
}

impl std::error::Error for WebError {}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }
}

/// Everything the runner needs from the page.
///
/// A browser binding maps these onto `getBoundingClientRect`,
/// `performance.now`, `requestAnimationFrame`, and `scrollTo` /
/// `scrollIntoView`. Scroll requests are fire-and-forget.
pub trait ScrollHost {
    /// Current section geometry, or `None` while the section element is not
    /// attached.
    fn measure(&self) -> Option<ScrollMeasurement>;

    /// Monotonic time.
    fn now(&self) -> Duration;

    /// Schedule one frame callback.
    fn request_animation_frame(&mut self) -> FrameHandle;

    /// Cancel a frame callback that has not run yet.
    fn cancel_animation_frame(&mut self, handle: FrameHandle);

    /// Smooth scroll the document to an absolute offset.
    fn smooth_scroll_to(&mut self, top: f64);

    /// Smooth scroll the section's next sibling into view.
    fn scroll_next_section_into_view(&mut self);
}

/// Request queued by [`WebScrollHost`] for the embedding page to carry out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostCommand {
    RequestFrame(FrameHandle),
    CancelFrame(FrameHandle),
    ScrollTo { top: f64 },
    ScrollNextIntoView,
}

/// Host-driven [`ScrollHost`] for WASM and tests.
///
/// The host pushes measurements and time; every side effect lands in a
/// command queue that the host drains after each call into the runner.
#[derive(Debug, Clone, Default)]
pub struct WebScrollHost {
    clock: DeterministicClock,
    measurement: Option<ScrollMeasurement>,
    next_frame: u64,
    commands: VecDeque<HostCommand>,
}

impl WebScrollHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current section geometry.
    pub fn set_measurement(&mut self, measurement: ScrollMeasurement) {
        self.measurement = Some(measurement);
    }

    /// Forget the section geometry (element detached).
    pub fn clear_measurement(&mut self) {
        self.measurement = None;
    }

    /// Move only the document scroll offset, keeping the last section
    /// geometry. Ignored until a measurement has been set.
    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        if let Some(m) = self.measurement.as_mut() {
            m.scroll_y = scroll_y;
        }
    }

    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    pub fn advance(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    #[must_use]
    pub fn clock(&self) -> &DeterministicClock {
        &self.clock
    }

    /// Number of commands waiting to be drained.
    #[must_use]
    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Drain all queued commands.
    pub fn drain_commands(&mut self) -> impl Iterator<Item = HostCommand> + '_ {
        self.commands.drain(..)
    }
}

impl ScrollHost for WebScrollHost {
    fn measure(&self) -> Option<ScrollMeasurement> {
        self.measurement
    }

    fn now(&self) -> Duration {
        self.clock.now()
    }

    fn request_animation_frame(&mut self) -> FrameHandle {
        self.next_frame = self.next_frame.wrapping_add(1);
        let handle = FrameHandle(self.next_frame);
        self.commands.push_back(HostCommand::RequestFrame(handle));
        handle
    }

    fn cancel_animation_frame(&mut self, handle: FrameHandle) {
        self.commands.push_back(HostCommand::CancelFrame(handle));
    }

    fn smooth_scroll_to(&mut self, top: f64) {
        self.commands.push_back(HostCommand::ScrollTo { top });
    }

    fn scroll_next_section_into_view(&mut self) {
        self.commands.push_back(HostCommand::ScrollNextIntoView);
    }
}

/// Render-ready snapshot of one story scroll section.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView<'a> {
    pub active_index: usize,
    pub panel_count: usize,
    pub panel: &'a Panel,
    /// One entry per panel; `true` for the active one.
    pub dots: Vec<bool>,
    pub pin_mode: PinMode,
    pub phase: Phase,
    pub progress: f64,
    pub transition: TransitionFrame,
    pub header_scrolled: bool,
    pub section_revealed: bool,
}

/// Listener lifecycle around one [`Navigator`].
///
/// While unmounted every notification is ignored. Mounting resets the
/// navigator and runs one update immediately so the first paint reflects
/// the current scroll position.
#[derive(Debug)]
pub struct StoryScrollRunner<H: ScrollHost> {
    host: H,
    navigator: Navigator,
    scheduler: FrameScheduler,
    header: HeaderScrollState,
    reveal: InViewTracker,
    story: StoryConfig,
    mounted: bool,
    last_outcome: FrameOutcome,
}

impl<H: ScrollHost> StoryScrollRunner<H> {
    /// Runner with default reveal and header settings.
    #[must_use]
    pub fn new(host: H, panels: PanelSet, config: NavigatorConfig) -> Self {
        let story = StoryConfig {
            navigator: config,
            ..StoryConfig::default()
        };
        Self::with_story(host, panels, story)
    }

    /// Runner built from a full [`StoryConfig`], including its panel list.
    pub fn from_config(host: H, story: StoryConfig) -> Result<Self, ConfigError> {
        let story = story.validated()?;
        let panels = story.panel_set()?;
        Ok(Self::with_story(host, panels, story))
    }

    fn with_story(host: H, panels: PanelSet, mut story: StoryConfig) -> Self {
        story.panels.clear();
        Self {
            host,
            navigator: Navigator::new(panels, story.navigator),
            scheduler: FrameScheduler::new(),
            header: HeaderScrollState::new(story.header),
            reveal: InViewTracker::new(story.reveal),
            story,
            mounted: false,
            last_outcome: FrameOutcome::default(),
        }
    }

    /// Start listening and run the first update.
    pub fn mount(&mut self) -> Result<FrameOutcome, WebError> {
        if self.mounted {
            return Err(WebError::AlreadyMounted);
        }
        self.mounted = true;
        self.navigator.reset();
        self.header = HeaderScrollState::new(self.story.header);
        self.reveal = InViewTracker::new(self.story.reveal);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "storyscroll.frame",
            panels = self.navigator.panels().len(),
            "mounted"
        );
        Ok(self.run_update())
    }

    /// Stop listening and cancel the pending frame, if any.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        if let Some(handle) = self.scheduler.cancel() {
            self.host.cancel_animation_frame(handle);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "storyscroll.frame", "unmounted");
    }

    /// Scroll notification. Returns `true` if a new frame was requested.
    pub fn on_scroll(&mut self) -> bool {
        self.request_frame()
    }

    /// Resize notification. Shares the scroll path and its coalescing.
    pub fn on_resize(&mut self) -> bool {
        self.request_frame()
    }

    fn request_frame(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        let host = &mut self.host;
        self.scheduler.request(|| host.request_animation_frame())
    }

    /// Frame callback for `handle`. Returns the update outcome, or `None`
    /// when the handle is stale or the runner is unmounted.
    pub fn on_animation_frame(&mut self, handle: FrameHandle) -> Option<FrameOutcome> {
        if !self.mounted || !self.scheduler.take(handle) {
            return None;
        }
        Some(self.run_update())
    }

    fn run_update(&mut self) -> FrameOutcome {
        let Some(measurement) = self.host.measure() else {
            #[cfg(feature = "tracing")]
            tracing::trace!(target: "storyscroll.frame", "section not attached");
            self.last_outcome = FrameOutcome {
                skipped: true,
                ..FrameOutcome::default()
            };
            return self.last_outcome;
        };
        let now = self.host.now();
        let outcome = self.navigator.update(measurement, now);
        if !outcome.skipped {
            self.header.observe(measurement.scroll_y);
            self.reveal.observe(
                measurement.section_top - measurement.scroll_y,
                measurement.section_height,
                measurement.viewport_height,
            );
        }
        match outcome.command {
            Some(ScrollCommand::SmoothScrollTo { top }) => self.host.smooth_scroll_to(top),
            Some(ScrollCommand::ScrollNextSectionIntoView) => {
                self.host.scroll_next_section_into_view();
            }
            None => {}
        }
        self.last_outcome = outcome;
        outcome
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[must_use]
    pub fn state(&self) -> &NavigatorState {
        self.navigator.state()
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[must_use]
    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// Outcome of the most recent update.
    #[must_use]
    pub fn last_outcome(&self) -> FrameOutcome {
        self.last_outcome
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Snapshot for rendering at the host's current time.
    #[must_use]
    pub fn view(&self) -> PanelView<'_> {
        let state = self.navigator.state();
        let panel_count = self.navigator.panels().len();
        PanelView {
            active_index: state.active_index,
            panel_count,
            panel: self.navigator.active_panel(),
            dots: (0..panel_count).map(|i| i == state.active_index).collect(),
            pin_mode: state.pin_mode(),
            phase: state.phase,
            progress: state.progress,
            transition: self.navigator.transition_frame(self.host.now()),
            header_scrolled: self.header.is_scrolled(),
            section_revealed: self.reveal.in_view(),
        }
    }
}
