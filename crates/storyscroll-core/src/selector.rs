#![forbid(unsafe_code)]

//! Panel selection: discretize progress into equal-width panel slots.

/// Panel index for `progress` over `panel_count` equal slots.
///
/// `progress == 1.0` lands on the last slot rather than one past it. Out of
/// range or non-finite progress is clamped first, and a `panel_count` of zero
/// is treated as one.
#[must_use]
pub fn select_panel(progress: f64, panel_count: usize) -> usize {
    let count = panel_count.max(1);
    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    // Float-to-int `as` saturates, so the cast cannot overflow.
    let slot = (progress * count as f64).floor() as usize;
    slot.min(count - 1)
}
