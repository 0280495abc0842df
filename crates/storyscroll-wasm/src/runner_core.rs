#![forbid(unsafe_code)]

//! Platform-independent runner core wrapping
//! `StoryScrollRunner<WebScrollHost>`.
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and the native test harness. No JS/WASM types here; structured results
//! cross the boundary as JSON strings.

use core::time::Duration;

use serde_json::{Value, json};
use storyscroll_core::config::ConfigError;
use storyscroll_core::frame_scheduler::FrameHandle;
use storyscroll_core::navigator::PanelChange;
use storyscroll_core::transition::PanelPose;
use storyscroll_core::{FrameOutcome, Phase, ScrollMeasurement, StoryConfig};
use storyscroll_web::{HostCommand, StoryScrollRunner, WebScrollHost};

use crate::catalog::demo_story;

fn time_from_ms(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::ZERO)
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Before => "before",
        Phase::Pinned(_) => "pinned",
        Phase::After => "after",
    }
}

fn pose_json(pose: PanelPose) -> Value {
    json!({
        "index": pose.index,
        "opacity": pose.opacity,
        "offset_y": pose.offset_y,
    })
}

fn command_json(command: HostCommand) -> Value {
    match command {
        HostCommand::RequestFrame(handle) => json!({ "kind": "request_frame", "handle": handle.0 }),
        HostCommand::CancelFrame(handle) => json!({ "kind": "cancel_frame", "handle": handle.0 }),
        HostCommand::ScrollTo { top } => json!({ "kind": "scroll_to", "top": top }),
        HostCommand::ScrollNextIntoView => json!({ "kind": "scroll_next_into_view" }),
    }
}

/// Platform-independent story scroll runner for JS hosts.
pub struct RunnerCore {
    inner: StoryScrollRunner<WebScrollHost>,
}

impl RunnerCore {
    /// Runner over the built-in demo service catalog.
    pub fn demo() -> Result<Self, ConfigError> {
        Self::from_story(demo_story())
    }

    /// Runner from a JSON `StoryConfig`. An empty panel list falls back to
    /// the demo catalog.
    pub fn from_json(config_json: &str) -> Result<Self, ConfigError> {
        let mut story = StoryConfig::from_json_str(config_json)?;
        if story.panels.is_empty() {
            story.panels = demo_story().panels;
        }
        Self::from_story(story)
    }

    fn from_story(story: StoryConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: StoryScrollRunner::from_config(WebScrollHost::new(), story)?,
        })
    }

    /// Report section geometry from `getBoundingClientRect` and friends.
    pub fn set_measurement(
        &mut self,
        scroll_y: f64,
        rect_top: f64,
        section_height: f64,
        viewport_height: f64,
        has_next_section: bool,
    ) {
        self.inner
            .host_mut()
            .set_measurement(ScrollMeasurement::from_client_rect(
                scroll_y,
                rect_top,
                section_height,
                viewport_height,
                has_next_section,
            ));
    }

    /// Forget the section geometry (element detached).
    pub fn clear_measurement(&mut self) {
        self.inner.host_mut().clear_measurement();
    }

    /// Set the deterministic clock to absolute milliseconds.
    pub fn set_time_ms(&mut self, ms: f64) {
        self.inner.host_mut().set_time(time_from_ms(ms));
    }

    /// Advance the deterministic clock by `dt_ms` milliseconds.
    pub fn advance_time_ms(&mut self, dt_ms: f64) {
        self.inner.host_mut().advance(time_from_ms(dt_ms));
    }

    /// Returns `false` if already mounted.
    pub fn mount(&mut self) -> bool {
        self.inner.mount().is_ok()
    }

    pub fn unmount(&mut self) {
        self.inner.unmount();
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.is_mounted()
    }

    pub fn on_scroll(&mut self) -> bool {
        self.inner.on_scroll()
    }

    pub fn on_resize(&mut self) -> bool {
        self.inner.on_resize()
    }

    /// Run the frame callback for `handle`. Returns `false` for stale
    /// handles or while unmounted.
    pub fn on_animation_frame(&mut self, handle: u64) -> bool {
        self.inner
            .on_animation_frame(FrameHandle(handle))
            .is_some()
    }

    /// Drain queued host commands as a JSON array.
    pub fn drain_commands_json(&mut self) -> String {
        let commands: Vec<Value> = self
            .inner
            .host_mut()
            .drain_commands()
            .map(command_json)
            .collect();
        Value::Array(commands).to_string()
    }

    pub fn active_index(&self) -> usize {
        self.inner.state().active_index
    }

    pub fn is_pinned(&self) -> bool {
        self.inner.state().is_pinned
    }

    pub fn panel_count(&self) -> usize {
        self.inner.navigator().panels().len()
    }

    /// Outcome of the most recent update as JSON.
    pub fn last_outcome_json(&self) -> String {
        let FrameOutcome {
            skipped,
            panel_change,
            pin_changed,
            command,
        } = self.inner.last_outcome();
        json!({
            "skipped": skipped,
            "panel_change": panel_change.map(|PanelChange { from, to }| json!({ "from": from, "to": to })),
            "pin_changed": pin_changed,
            "has_command": command.is_some(),
        })
        .to_string()
    }

    /// Render snapshot as JSON.
    pub fn view_json(&self) -> String {
        let view = self.inner.view();
        json!({
            "active_index": view.active_index,
            "panel_count": view.panel_count,
            "panel": {
                "title": view.panel.title,
                "body": view.panel.body,
                "bullets": view.panel.bullets,
                "image": view.panel.image,
            },
            "dots": view.dots,
            "position": view.pin_mode.css_position(),
            "phase": phase_label(view.phase),
            "progress": view.progress,
            "transition": {
                "exiting": view.transition.exiting.map(pose_json),
                "entering": pose_json(view.transition.entering),
                "complete": view.transition.complete,
            },
            "header_scrolled": view.header_scrolled,
            "section_revealed": view.section_revealed,
        })
        .to_string()
    }
}
