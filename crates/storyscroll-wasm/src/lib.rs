#![forbid(unsafe_code)]

//! WASM bindings for the storyscroll navigator.
//!
//! This crate provides [`StoryScroll`], a `wasm-bindgen`-exported struct that
//! wraps `storyscroll_web::StoryScrollRunner<WebScrollHost>` and exposes it
//! to JavaScript for host-driven execution.
//!
//! Without a config the runner shows the built-in demo catalog
//! ([`catalog::demo_story`]).

pub mod catalog;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::StoryScroll;

// Runner core is used by the wasm module and by native tests.
#[cfg(any(target_arch = "wasm32", test))]
mod runner_core;
