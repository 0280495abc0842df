#![no_main]

use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use storyscroll_core::{Navigator, NavigatorConfig, Panel, PanelSet, ScrollCommand, ScrollMeasurement};

fuzz_target!(|data: &[u8]| {
    // First byte picks the panel count (1..=16); the rest is read as
    // little-endian f64 quadruples plus a flag byte.
    let Some((&count, rest)) = data.split_first() else {
        return;
    };
    let count = usize::from(count % 16) + 1;
    let Ok(panels) = PanelSet::new(
        (0..count)
            .map(|i| Panel::new(format!("panel {i}"), ""))
            .collect(),
    ) else {
        return;
    };
    let mut nav = Navigator::new(panels, NavigatorConfig::default());

    let mut now = Duration::ZERO;
    for chunk in rest.chunks_exact(33) {
        let f = |i: usize| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&chunk[i * 8..i * 8 + 8]);
            f64::from_le_bytes(bytes)
        };
        let m = ScrollMeasurement {
            scroll_y: f(0),
            section_top: f(1),
            section_height: f(2),
            viewport_height: f(3),
            has_next_section: chunk[32] & 1 == 1,
        };
        now += Duration::from_millis(u64::from(chunk[32] >> 1));
        let before = nav.state().last_scroll_y;
        let outcome = nav.update(m, now);
        let state = nav.state();

        // Post-conditions that must always hold:
        assert!(state.active_index < count, "active index OOB");
        assert!((0.0..=1.0).contains(&state.progress), "progress out of range");
        assert!(
            !(state.is_snapping_up && state.is_auto_advancing),
            "both latches set"
        );
        if outcome.skipped {
            assert_eq!(state.last_scroll_y.to_bits(), before.to_bits(), "skip mutated state");
        }
        match outcome.command {
            Some(ScrollCommand::SmoothScrollTo { .. }) => assert!(m.scroll_y < before),
            Some(ScrollCommand::ScrollNextSectionIntoView) => {
                assert!(m.scroll_y > before);
                assert!(m.has_next_section);
            }
            None => {}
        }
    }
});
