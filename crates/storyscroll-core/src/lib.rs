#![forbid(unsafe_code)]

//! Core: the scroll-synchronized pinned section navigator.
//!
//! # Role in storyscroll
//! `storyscroll-core` is the platform-independent half of the "story scroll"
//! presentation: a tall document section that pins itself to the viewport
//! while the user scrolls through it, cycling through an ordered set of
//! content panels, and hands control back to normal document flow before and
//! after the cycle.
//!
//! # Primary responsibilities
//! - **Scroll tracking**: [`geometry`] turns one host measurement into a
//!   [`geometry::ScrollSample`] and a normalized progress value.
//! - **Panel selection**: [`selector`] discretizes progress into a panel index.
//! - **Pinning**: [`pin`] decides fixed-in-viewport vs inline rendering.
//! - **Boundary handling**: [`boundary`] owns the snap-back and auto-advance
//!   latches plus the snap cooldown.
//! - **Frame coalescing**: [`frame_scheduler`] collapses scroll/resize floods
//!   into at most one update per animation frame.
//!
//! # How it fits in the system
//! [`navigator::Navigator`] consumes one measurement per frame and returns a
//! [`navigator::FrameOutcome`] holding any [`navigator::ScrollCommand`]s for
//! the host. It never touches a DOM; `storyscroll-web` owns the host side.

pub mod boundary;
pub mod config;
pub mod frame_scheduler;
pub mod geometry;
pub mod header;
pub mod navigator;
pub mod panel;
pub mod pin;
pub mod reveal;
pub mod selector;
pub mod transition;

pub use config::{NavigatorConfig, StoryConfig};
pub use geometry::{ScrollDirection, ScrollMeasurement, ScrollSample};
pub use navigator::{FrameOutcome, Navigator, NavigatorState, Phase, ScrollCommand};
pub use panel::{Panel, PanelSet, PanelSetError};
