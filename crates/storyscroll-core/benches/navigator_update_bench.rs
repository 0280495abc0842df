//! Benchmark: per-frame navigator update cost.
//!
//! Run with: `cargo bench -p storyscroll-core --bench navigator_update_bench`
//!
//! Measures a single `Navigator::update` at rest, across a full downward
//! pass of a pinned section, and the pure geometry helpers it is built on.

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use storyscroll_core::geometry::{max_scroll, progress};
use storyscroll_core::selector::select_panel;
use storyscroll_core::{Navigator, NavigatorConfig, Panel, PanelSet, ScrollMeasurement};

const VIEWPORT: f64 = 900.0;

fn panels(count: usize) -> PanelSet {
    match PanelSet::new(
        (0..count)
            .map(|i| Panel::new(format!("panel {i}"), "body").bullet("point"))
            .collect(),
    ) {
        Ok(set) => set,
        Err(err) => panic!("bench panel set: {err}"),
    }
}

fn measurement(scroll_y: f64, count: usize) -> ScrollMeasurement {
    ScrollMeasurement {
        scroll_y,
        section_top: 1200.0,
        section_height: count as f64 * VIEWPORT,
        viewport_height: VIEWPORT,
        has_next_section: true,
    }
}

// ===========================================================================
// Geometry helpers
// ===========================================================================

fn bench_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry");
    group.bench_function("progress", |b| {
        let max = max_scroll(3600.0, VIEWPORT);
        b.iter(|| black_box(progress(black_box(2450.0), black_box(1200.0), max)));
    });
    group.bench_function("select_panel", |b| {
        b.iter(|| black_box(select_panel(black_box(0.61), black_box(4))));
    });
    group.finish();
}

// ===========================================================================
// Navigator update
// ===========================================================================

fn bench_update_idle(c: &mut Criterion) {
    let mut nav = Navigator::new(panels(4), NavigatorConfig::default());
    let m = measurement(2000.0, 4);
    nav.update(m, Duration::ZERO);

    c.bench_function("update/idle_repeat", |b| {
        b.iter(|| black_box(nav.update(black_box(m), Duration::ZERO)));
    });
}

fn bench_update_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("update/full_pass");
    for count in [2usize, 4, 16] {
        let end = 1200.0 + count as f64 * VIEWPORT;
        let steps: Vec<f64> = (0..)
            .map(|i| i as f64 * 16.0)
            .take_while(|y| *y <= end + 400.0)
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &steps, |b, steps| {
            b.iter(|| {
                let mut nav = Navigator::new(panels(count), NavigatorConfig::default());
                for (i, y) in steps.iter().enumerate() {
                    let outcome = nav.update(
                        measurement(*y, count),
                        Duration::from_millis(i as u64 * 16),
                    );
                    black_box(outcome);
                }
                black_box(nav.state().active_index)
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_geometry,
    bench_update_idle,
    bench_update_pass
);
criterion_main!(benches);
