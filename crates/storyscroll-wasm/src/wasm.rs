#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for [`StoryScroll`].
//!
//! This module wraps [`super::runner_core::RunnerCore`] with JS-friendly
//! types. Only compiled on `wasm32` targets.

use js_sys::Reflect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::runner_core::RunnerCore;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

/// One pinned story scroll section, driven by the page.
///
/// The host wires `scroll` / `resize` listeners to `onScroll` / `onResize`,
/// reports geometry with `setMeasurement`, and after every call drains
/// `drainCommands()` to schedule frames and perform smooth scrolls.
#[wasm_bindgen]
pub struct StoryScroll {
    inner: RunnerCore,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl StoryScroll {
    /// Create from an optional JSON `StoryConfig`; without one the demo
    /// service catalog is used.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<StoryScroll, JsValue> {
        install_panic_hook();
        let inner = match config_json.as_deref() {
            Some(json) => RunnerCore::from_json(json),
            None => RunnerCore::demo(),
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { inner })
    }

    /// Report `window.scrollY`, the section's `getBoundingClientRect().top`,
    /// its `offsetHeight`, `window.innerHeight`, and whether a next sibling
    /// section exists.
    #[wasm_bindgen(js_name = setMeasurement)]
    pub fn set_measurement(
        &mut self,
        scroll_y: f64,
        rect_top: f64,
        section_height: f64,
        viewport_height: f64,
        has_next_section: bool,
    ) {
        self.inner.set_measurement(
            scroll_y,
            rect_top,
            section_height,
            viewport_height,
            has_next_section,
        );
    }

    /// The section element was detached.
    #[wasm_bindgen(js_name = clearMeasurement)]
    pub fn clear_measurement(&mut self) {
        self.inner.clear_measurement();
    }

    /// Set deterministic clock to absolute milliseconds (`performance.now()`).
    #[wasm_bindgen(js_name = setTime)]
    pub fn set_time(&mut self, ms: f64) {
        self.inner.set_time_ms(ms);
    }

    /// Advance deterministic clock by `dt_ms` milliseconds.
    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&mut self, dt_ms: f64) {
        self.inner.advance_time_ms(dt_ms);
    }

    /// Start listening and run the first update. Returns `false` if
    /// already mounted.
    pub fn mount(&mut self) -> bool {
        self.inner.mount()
    }

    /// Stop listening; a pending frame is cancelled via `drainCommands`.
    pub fn unmount(&mut self) {
        self.inner.unmount();
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.inner.is_mounted()
    }

    /// Returns `true` if a new animation frame was requested.
    #[wasm_bindgen(js_name = onScroll)]
    pub fn on_scroll(&mut self) -> bool {
        self.inner.on_scroll()
    }

    #[wasm_bindgen(js_name = onResize)]
    pub fn on_resize(&mut self) -> bool {
        self.inner.on_resize()
    }

    /// Frame callback for a handle from a `request_frame` command.
    #[wasm_bindgen(js_name = onAnimationFrame)]
    pub fn on_animation_frame(&mut self, handle: f64) -> bool {
        if !handle.is_finite() || handle < 0.0 {
            return false;
        }
        self.inner.on_animation_frame(handle as u64)
    }

    /// Queued host commands as a JSON array of `{ kind, ... }` objects.
    #[wasm_bindgen(js_name = drainCommands)]
    pub fn drain_commands(&mut self) -> String {
        self.inner.drain_commands_json()
    }

    #[wasm_bindgen(js_name = activeIndex)]
    pub fn active_index(&self) -> u32 {
        u32::try_from(self.inner.active_index()).unwrap_or(u32::MAX)
    }

    #[wasm_bindgen(js_name = isPinned)]
    pub fn is_pinned(&self) -> bool {
        self.inner.is_pinned()
    }

    #[wasm_bindgen(js_name = panelCount)]
    pub fn panel_count(&self) -> u32 {
        u32::try_from(self.inner.panel_count()).unwrap_or(u32::MAX)
    }

    #[wasm_bindgen(js_name = lastOutcomeJson)]
    pub fn last_outcome_json(&self) -> String {
        self.inner.last_outcome_json()
    }

    /// Render snapshot as JSON.
    #[wasm_bindgen(js_name = viewJson)]
    pub fn view_json(&self) -> String {
        self.inner.view_json()
    }
}
