#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use storyscroll_core::frame_scheduler::FrameHandle;
use storyscroll_core::{NavigatorConfig, Panel, PanelSet, ScrollMeasurement};
use storyscroll_web::{HostCommand, StoryScrollRunner, WebScrollHost};

#[derive(Arbitrary, Debug)]
enum Op {
    Measure {
        scroll_y: i32,
        section_top: i32,
        section_height: u16,
        viewport_height: u16,
        has_next_section: bool,
    },
    Detach,
    Scroll,
    Resize,
    Frame,
    StaleFrame(u8),
    Tick(u16),
    Mount,
    Unmount,
}

fuzz_target!(|ops: Vec<Op>| {
    let Ok(panels) = PanelSet::new(vec![
        Panel::new("a", ""),
        Panel::new("b", ""),
        Panel::new("c", ""),
    ]) else {
        return;
    };
    let mut runner = StoryScrollRunner::new(WebScrollHost::new(), panels, NavigatorConfig::default());
    let mut outstanding: Option<FrameHandle> = None;

    for op in ops {
        match op {
            Op::Measure {
                scroll_y,
                section_top,
                section_height,
                viewport_height,
                has_next_section,
            } => runner.host_mut().set_measurement(ScrollMeasurement {
                scroll_y: f64::from(scroll_y),
                section_top: f64::from(section_top),
                section_height: f64::from(section_height),
                viewport_height: f64::from(viewport_height),
                has_next_section,
            }),
            Op::Detach => runner.host_mut().clear_measurement(),
            Op::Scroll => {
                runner.on_scroll();
            }
            Op::Resize => {
                runner.on_resize();
            }
            Op::Frame => {
                if let Some(handle) = outstanding.take() {
                    assert!(runner.on_animation_frame(handle).is_some());
                }
            }
            Op::StaleFrame(n) => {
                let stale = FrameHandle(u64::from(n) + 1_000_000);
                assert!(runner.on_animation_frame(stale).is_none());
            }
            Op::Tick(ms) => runner.host_mut().advance(Duration::from_millis(u64::from(ms))),
            Op::Mount => {
                let was_mounted = runner.is_mounted();
                assert_eq!(runner.mount().is_ok(), !was_mounted);
            }
            Op::Unmount => runner.unmount(),
        }

        for command in runner.host_mut().drain_commands() {
            match command {
                HostCommand::RequestFrame(handle) => {
                    assert!(outstanding.is_none(), "two frames outstanding");
                    outstanding = Some(handle);
                }
                HostCommand::CancelFrame(handle) => {
                    assert_eq!(outstanding.take(), Some(handle));
                }
                HostCommand::ScrollTo { .. } | HostCommand::ScrollNextIntoView => {}
            }
        }
        assert_eq!(runner.scheduler().pending(), outstanding);
        assert!(runner.state().active_index < 3);
    }
});
