//! End-to-end navigator scenarios driven by synthetic scroll traces.
//!
//! Each scenario feeds a sequence of measurements through one navigator and
//! checks the resulting state and emitted scroll commands.

use std::time::Duration;

use storyscroll_core::navigator::PanelChange;
use storyscroll_core::{
    Navigator, NavigatorConfig, Panel, PanelSet, Phase, ScrollCommand, ScrollMeasurement,
};

const VIEWPORT: f64 = 900.0;
const TOP: f64 = 1200.0;

fn four_panels() -> PanelSet {
    PanelSet::new(vec![
        Panel::new("Custom Websites", "Fast sites.").bullet("Landing pages"),
        Panel::new("CRM Workflows", "Lead routing.").image("/crm.png"),
        Panel::new("Backend Systems", "APIs and pipelines."),
        Panel::new("Custom App Solutions", "Internal tools.").image("/app.png"),
    ])
    .unwrap()
}

fn navigator() -> Navigator {
    Navigator::new(four_panels(), NavigatorConfig::default())
}

/// Section height = 4 × viewport, pin end = TOP + 3 × viewport.
fn at(scroll_y: f64) -> ScrollMeasurement {
    ScrollMeasurement {
        scroll_y,
        section_top: TOP,
        section_height: 4.0 * VIEWPORT,
        viewport_height: VIEWPORT,
        has_next_section: true,
    }
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn pin_end() -> f64 {
    TOP + 3.0 * VIEWPORT
}

// ═══════════════════════════════════════════════════════════════════════
// Scenario A: four panels over a 4× viewport section
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn scenario_a_pins_at_top_and_reaches_last_panel() {
    let mut nav = navigator();

    nav.update(at(TOP), ms(0));
    assert_eq!(nav.state().active_index, 0);
    assert!(nav.state().is_pinned);

    nav.update(at(TOP + 3.0 * VIEWPORT), ms(16));
    assert_eq!(nav.state().active_index, 3);
    assert!(nav.state().is_pinned);
}

#[test]
fn scenario_a_walks_every_panel_in_order() {
    let mut nav = navigator();
    let mut changes = Vec::new();
    let mut y = 0.0;
    let mut t = 0;
    while y <= pin_end() {
        let outcome = nav.update(at(y), ms(t));
        changes.extend(outcome.panel_change);
        y += 50.0;
        t += 16;
    }
    assert_eq!(
        changes,
        vec![
            PanelChange { from: 0, to: 1 },
            PanelChange { from: 1, to: 2 },
            PanelChange { from: 2, to: 3 },
        ]
    );
}

#[test]
fn scrolling_up_inside_pin_range_steps_back() {
    let mut nav = navigator();
    nav.update(at(TOP + 2.5 * VIEWPORT), ms(0));
    assert_eq!(nav.state().phase, Phase::Pinned(3));
    let outcome = nav.update(at(TOP + 1.9 * VIEWPORT), ms(16));
    assert_eq!(outcome.panel_change, Some(PanelChange { from: 3, to: 2 }));
    assert_eq!(outcome.command, None);
    assert_eq!(nav.state().phase, Phase::Pinned(2));
}

// ═══════════════════════════════════════════════════════════════════════
// Scenario B: auto-advance fires once per downward pass
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn scenario_b_single_auto_advance() {
    let mut nav = navigator();
    nav.update(at(TOP + 2.9 * VIEWPORT), ms(0));

    // progress = 0.99
    let outcome = nav.update(at(TOP + 0.99 * 3.0 * VIEWPORT), ms(16));
    assert_eq!(outcome.command, Some(ScrollCommand::ScrollNextSectionIntoView));
    assert!(nav.state().is_auto_advancing);

    // progress = 1.0, still moving down
    let outcome = nav.update(at(pin_end()), ms(32));
    assert_eq!(outcome.command, None);

    // The programmatic scroll carries the page past the section.
    let outcome = nav.update(at(pin_end() + 400.0), ms(48));
    assert_eq!(outcome.command, None);
    assert_eq!(nav.state().phase, Phase::After);
}

#[test]
fn auto_advance_rearms_after_scrolling_back_in() {
    let mut nav = navigator();
    nav.update(at(TOP + 2.9 * VIEWPORT), ms(0));
    assert!(nav.update(at(pin_end()), ms(16)).command.is_some());

    // Back into the section, below the threshold.
    nav.update(at(TOP + 2.5 * VIEWPORT), ms(32));
    assert!(!nav.state().is_auto_advancing);

    let outcome = nav.update(at(pin_end()), ms(48));
    assert_eq!(outcome.command, Some(ScrollCommand::ScrollNextSectionIntoView));
}

#[test]
fn auto_advance_skipped_without_next_section() {
    let mut nav = navigator();
    let mut m = at(TOP + 2.9 * VIEWPORT);
    m.has_next_section = false;
    nav.update(m, ms(0));
    m.scroll_y = pin_end();
    assert_eq!(nav.update(m, ms(16)).command, None);
    assert!(!nav.state().is_auto_advancing);
}

// ═══════════════════════════════════════════════════════════════════════
// Scenario C: snap-back with cooldown
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn scenario_c_snap_back_then_cooldown() {
    let mut nav = navigator();
    let mut below = at(pin_end() + 260.0);
    below.has_next_section = false;
    nav.update(below, ms(0));

    below.scroll_y = pin_end() + 200.0;
    let outcome = nav.update(below, ms(100));
    assert_eq!(outcome.command, Some(ScrollCommand::SmoothScrollTo { top: TOP }));
    assert!(nav.state().is_snapping_up);
    assert!(nav.state().snap_cooldown_active);

    below.scroll_y = pin_end() + 150.0;
    let outcome = nav.update(below, ms(400));
    assert_eq!(outcome.command, None);

    // Cooldown over once 600 ms have elapsed since the snap.
    below.scroll_y = pin_end() + 120.0;
    nav.update(below, ms(700));
    assert!(!nav.state().snap_cooldown_active);
}

#[test]
fn snap_back_interrupted_by_user_recovers() {
    let mut nav = navigator();
    let mut m = at(pin_end() + 300.0);
    m.has_next_section = false;
    nav.update(m, ms(0));
    m.scroll_y = pin_end() + 250.0;
    assert!(nav.update(m, ms(16)).command.is_some());

    // The user fights the smooth scroll and heads back down.
    m.scroll_y = pin_end() + 280.0;
    assert_eq!(nav.update(m, ms(32)).command, None);
    assert!(!nav.state().is_snapping_up);

    // Upward again after the cooldown: a fresh snap is allowed.
    m.scroll_y = pin_end() + 240.0;
    let outcome = nav.update(m, ms(900));
    assert_eq!(outcome.command, Some(ScrollCommand::SmoothScrollTo { top: TOP }));
}

#[test]
fn snap_back_not_triggered_far_below() {
    let mut nav = navigator();
    nav.update(at(pin_end() + 2000.0), ms(0));
    let outcome = nav.update(at(pin_end() + 1500.0), ms(16));
    assert_eq!(outcome.command, None);
}

// ═══════════════════════════════════════════════════════════════════════
// Scenario D: degenerate section height
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn scenario_d_section_equal_to_viewport_never_pins() {
    let mut nav = navigator();
    let mut t = 0;
    for y in [0.0, TOP - 1.0, TOP, TOP + 0.5, TOP + 1.0, TOP + 500.0] {
        let m = ScrollMeasurement {
            scroll_y: y,
            section_top: TOP,
            section_height: VIEWPORT,
            viewport_height: VIEWPORT,
            has_next_section: false,
        };
        let outcome = nav.update(m, ms(t));
        assert!(!outcome.skipped);
        assert!(!nav.state().is_pinned, "pinned at y={y}");
        assert!(nav.state().active_index < 4);
        t += 16;
    }
    // maxScroll floors to 1 px, so half a pixel is half progress.
    nav.update(
        ScrollMeasurement {
            scroll_y: TOP + 0.5,
            section_top: TOP,
            section_height: VIEWPORT,
            viewport_height: VIEWPORT,
            has_next_section: false,
        },
        ms(t),
    );
    assert_eq!(nav.state().progress, 0.5);
    assert_eq!(nav.state().active_index, 2);
}

#[test]
fn independent_instances_do_not_share_latches() {
    let mut first = navigator();
    let mut second = navigator();
    first.update(at(TOP + 2.9 * VIEWPORT), ms(0));
    assert!(first.update(at(pin_end()), ms(16)).command.is_some());
    assert!(first.state().is_auto_advancing);
    assert!(!second.state().is_auto_advancing);

    second.update(at(TOP + 2.9 * VIEWPORT), ms(0));
    assert!(second.update(at(pin_end()), ms(16)).command.is_some());
}

#[test]
fn custom_thresholds_respected() {
    let config = NavigatorConfig {
        snap_back_threshold_px: 50.0,
        auto_advance_progress: 0.5,
        ..NavigatorConfig::default()
    };
    let mut nav = Navigator::new(four_panels(), config);
    // Last panel starts at progress 0.75, so 0.5 only matters from there.
    nav.update(at(TOP + 2.2 * VIEWPORT), ms(0));
    let outcome = nav.update(at(TOP + 2.3 * VIEWPORT), ms(16));
    assert_eq!(outcome.command, Some(ScrollCommand::ScrollNextSectionIntoView));

    let mut m = at(pin_end() + 100.0);
    m.has_next_section = false;
    let mut nav = Navigator::new(four_panels(), config);
    nav.update(m, ms(0));
    m.scroll_y = pin_end() + 80.0;
    assert_eq!(nav.update(m, ms(16)).command, None);
}
