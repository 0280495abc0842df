#![forbid(unsafe_code)]

//! Deterministic session recording and replay.
//!
//! [`SessionRecorder`] drives a [`StoryScrollRunner`] over a
//! [`WebScrollHost`] and records every host input: measurements, scroll and
//! resize notifications, clock ticks, and lifecycle changes. [`replay`] feeds
//! the same inputs through a fresh runner and verifies that each frame's
//! navigator checksum matches.
//!
//! # Trace layout
//!
//! - **Header**: panel count (must be first).
//! - **Measure**: new section geometry.
//! - **Scroll** / **Resize**: listener notifications.
//! - **Tick**: explicit clock update.
//! - **Mount** / **Unmount**: listener setup and teardown. A mount is
//!   always followed by the checkpoint of its immediate update.
//! - **Frame**: checkpoint with an FNV-1a checksum of the navigator state and
//!   emitted command, chained with every previous checkpoint.
//! - **Summary**: total frames and final checksum chain (must be last).
//!
//! # Determinism contract
//!
//! Given identical recorded inputs, panels, and config, replay **must**
//! produce identical frame checksums. Time only moves via tick records, and
//! frames are only delivered where the trace has a checkpoint.

use core::time::Duration;

use storyscroll_core::{
    FrameOutcome, NavigatorConfig, NavigatorState, PanelSet, Phase, ScrollCommand,
    ScrollMeasurement,
};

use crate::{StoryScrollRunner, WebError, WebScrollHost};

/// Schema version for session traces.
pub const SCHEMA_VERSION: &str = "storyscroll-trace-v2";

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a64_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn fnv1a64_u64(hash: u64, v: u64) -> u64 {
    fnv1a64_bytes(hash, &v.to_le_bytes())
}

fn fnv1a64_pair(prev: u64, next: u64) -> u64 {
    let hash = FNV_OFFSET_BASIS;
    let hash = fnv1a64_u64(hash, prev);
    fnv1a64_u64(hash, next)
}

/// FNV-1a checksum of a navigator state and the command emitted with it.
#[must_use]
pub fn checksum_frame(state: &NavigatorState, command: Option<ScrollCommand>) -> u64 {
    let (phase_tag, phase_index) = match state.phase {
        Phase::Before => (0u64, 0u64),
        Phase::Pinned(i) => (1, i as u64),
        Phase::After => (2, 0),
    };
    let (command_tag, command_top) = match command {
        None => (0u64, 0u64),
        Some(ScrollCommand::SmoothScrollTo { top }) => (1, top.to_bits()),
        Some(ScrollCommand::ScrollNextSectionIntoView) => (2, 0),
    };
    let flags = u64::from(state.is_pinned)
        | u64::from(state.is_auto_advancing) << 1
        | u64::from(state.is_snapping_up) << 2
        | u64::from(state.snap_cooldown_active) << 3;

    [
        state.active_index as u64,
        flags,
        state.last_scroll_y.to_bits(),
        state.progress.to_bits(),
        phase_tag,
        phase_index,
        command_tag,
        command_top,
    ]
    .into_iter()
    .fold(FNV_OFFSET_BASIS, fnv1a64_u64)
}

/// A single record in a session trace.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceRecord {
    /// Session header (must be first).
    Header { panel_count: usize },
    /// New section geometry from the host.
    Measure {
        ts_ns: u64,
        measurement: ScrollMeasurement,
    },
    /// Scroll listener fired.
    Scroll { ts_ns: u64 },
    /// Resize listener fired.
    Resize { ts_ns: u64 },
    /// Explicit clock update.
    Tick { ts_ns: u64 },
    /// Listeners installed; the next frame checkpoint is the mount update.
    Mount { ts_ns: u64 },
    /// Listeners removed.
    Unmount { ts_ns: u64 },
    /// Frame checkpoint with checksum.
    Frame {
        frame_idx: u64,
        ts_ns: u64,
        checksum: u64,
        checksum_chain: u64,
    },
    /// Trace summary (must be last).
    Summary {
        total_frames: u64,
        final_checksum_chain: u64,
    },
}

/// A complete recorded session trace.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionTrace {
    pub records: Vec<TraceRecord>,
}

impl SessionTrace {
    /// Number of frame checkpoints in the trace.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.records
            .iter()
            .filter(|r| matches!(r, TraceRecord::Frame { .. }))
            .count() as u64
    }

    /// Extract the final checksum chain from the summary record.
    #[must_use]
    pub fn final_checksum_chain(&self) -> Option<u64> {
        self.records.iter().rev().find_map(|r| match r {
            TraceRecord::Summary {
                final_checksum_chain,
                ..
            } => Some(*final_checksum_chain),
            _ => None,
        })
    }
}

/// Records a session for deterministic replay.
pub struct SessionRecorder {
    runner: StoryScrollRunner<WebScrollHost>,
    records: Vec<TraceRecord>,
    checksum_chain: u64,
    frame_idx: u64,
    current_ts_ns: u64,
}

impl SessionRecorder {
    #[must_use]
    pub fn new(panels: PanelSet, config: NavigatorConfig) -> Self {
        let records = vec![TraceRecord::Header {
            panel_count: panels.len(),
        }];
        Self {
            runner: StoryScrollRunner::new(WebScrollHost::new(), panels, config),
            records,
            checksum_chain: 0,
            frame_idx: 0,
            current_ts_ns: 0,
        }
    }

    /// Mount the runner and record its immediate update as a frame.
    pub fn mount(&mut self) -> Result<FrameOutcome, WebError> {
        let outcome = self.runner.mount()?;
        self.records.push(TraceRecord::Mount {
            ts_ns: self.current_ts_ns,
        });
        self.record_frame(outcome);
        Ok(outcome)
    }

    /// Record new section geometry.
    pub fn measure(&mut self, ts_ns: u64, measurement: ScrollMeasurement) {
        self.current_ts_ns = ts_ns;
        self.records.push(TraceRecord::Measure {
            ts_ns,
            measurement,
        });
        self.runner.host_mut().set_measurement(measurement);
    }

    /// Record a scroll notification.
    pub fn scroll(&mut self, ts_ns: u64) -> bool {
        self.current_ts_ns = ts_ns;
        self.records.push(TraceRecord::Scroll { ts_ns });
        self.runner.on_scroll()
    }

    /// Record a resize notification.
    pub fn resize(&mut self, ts_ns: u64) -> bool {
        self.current_ts_ns = ts_ns;
        self.records.push(TraceRecord::Resize { ts_ns });
        self.runner.on_resize()
    }

    /// Record a clock update to `ts_ns` nanoseconds since start.
    pub fn set_time(&mut self, ts_ns: u64) {
        self.current_ts_ns = ts_ns;
        self.records.push(TraceRecord::Tick { ts_ns });
        self.runner.host_mut().set_time(Duration::from_nanos(ts_ns));
    }

    /// Record listener teardown.
    pub fn unmount(&mut self, ts_ns: u64) {
        self.current_ts_ns = ts_ns;
        self.records.push(TraceRecord::Unmount { ts_ns });
        self.runner.unmount();
    }

    /// Deliver the pending animation frame, if any, and record a checkpoint.
    pub fn step(&mut self) -> Option<FrameOutcome> {
        let handle = self.runner.scheduler().pending()?;
        let outcome = self.runner.on_animation_frame(handle)?;
        self.record_frame(outcome);
        Some(outcome)
    }

    /// Finish recording and return the completed trace.
    #[must_use]
    pub fn finish(mut self) -> SessionTrace {
        self.records.push(TraceRecord::Summary {
            total_frames: self.frame_idx,
            final_checksum_chain: self.checksum_chain,
        });
        SessionTrace {
            records: self.records,
        }
    }

    #[must_use]
    pub fn runner(&self) -> &StoryScrollRunner<WebScrollHost> {
        &self.runner
    }

    pub fn runner_mut(&mut self) -> &mut StoryScrollRunner<WebScrollHost> {
        &mut self.runner
    }

    fn record_frame(&mut self, outcome: FrameOutcome) {
        let checksum = checksum_frame(self.runner.state(), outcome.command);
        let chain = fnv1a64_pair(self.checksum_chain, checksum);
        self.records.push(TraceRecord::Frame {
            frame_idx: self.frame_idx,
            ts_ns: self.current_ts_ns,
            checksum,
            checksum_chain: chain,
        });
        self.checksum_chain = chain;
        self.frame_idx += 1;
    }
}

/// Result of replaying a session trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayResult {
    /// Total frames replayed.
    pub total_frames: u64,
    /// Final checksum chain from replay.
    pub final_checksum_chain: u64,
    /// First frame where a checksum mismatch was detected, if any.
    pub first_mismatch: Option<ReplayMismatch>,
}

impl ReplayResult {
    /// Whether the replay produced identical checksums.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.first_mismatch.is_none()
    }
}

/// Description of a checksum mismatch during replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayMismatch {
    pub frame_idx: u64,
    pub expected: u64,
    pub actual: u64,
}

/// Errors that can occur during replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The trace is missing a header record.
    MissingHeader,
    /// The header panel count differs from the replay panel set.
    PanelCountMismatch { expected: usize, actual: usize },
    /// A frame checkpoint has no pending frame to deliver.
    MissingFrame { frame_idx: u64 },
    /// A runner error occurred during replay.
    Web(WebError),
    /// A JSONL line could not be parsed.
    Parse { line: usize, message: String },
}

impl core::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "trace missing header record"),
            Self::PanelCountMismatch { expected, actual } => {
                write!(f, "trace has {expected} panels, replay has {actual}")
            }
            Self::MissingFrame { frame_idx } => {
                write!(f, "no pending frame for checkpoint {frame_idx}")
            }
            Self::Web(e) => write!(f, "runner error: {e}"),
            Self::Parse { line, message } => write!(f, "line {line}: {message}"),
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<WebError> for ReplayError {
    fn from(e: WebError) -> Self {
        Self::Web(e)
    }
}

/// Replay a recorded session trace through a fresh runner.
///
/// A mount record mounts the runner and the checkpoint after it verifies
/// the mount update. Every other checkpoint delivers the pending animation
/// frame.
pub fn replay(
    panels: PanelSet,
    config: NavigatorConfig,
    trace: &SessionTrace,
) -> Result<ReplayResult, ReplayError> {
    let panel_count = trace
        .records
        .first()
        .and_then(|r| match r {
            TraceRecord::Header { panel_count } => Some(*panel_count),
            _ => None,
        })
        .ok_or(ReplayError::MissingHeader)?;
    if panel_count != panels.len() {
        return Err(ReplayError::PanelCountMismatch {
            expected: panel_count,
            actual: panels.len(),
        });
    }

    let mut runner = StoryScrollRunner::new(WebScrollHost::new(), panels, config);
    let mut mount_outcome: Option<FrameOutcome> = None;
    let mut replay_frame_idx: u64 = 0;
    let mut checksum_chain: u64 = 0;
    let mut first_mismatch: Option<ReplayMismatch> = None;

    for record in &trace.records {
        match record {
            TraceRecord::Measure { measurement, .. } => {
                runner.host_mut().set_measurement(*measurement);
            }
            TraceRecord::Scroll { .. } => {
                runner.on_scroll();
            }
            TraceRecord::Resize { .. } => {
                runner.on_resize();
            }
            TraceRecord::Tick { ts_ns } => {
                runner.host_mut().set_time(Duration::from_nanos(*ts_ns));
            }
            TraceRecord::Mount { .. } => mount_outcome = Some(runner.mount()?),
            TraceRecord::Unmount { .. } => runner.unmount(),
            TraceRecord::Frame {
                frame_idx: expected_idx,
                checksum: expected_checksum,
                ..
            } => {
                let outcome = match mount_outcome.take() {
                    Some(outcome) => outcome,
                    None => {
                        let pending = runner.scheduler().pending();
                        pending
                            .and_then(|handle| runner.on_animation_frame(handle))
                            .ok_or(ReplayError::MissingFrame {
                                frame_idx: *expected_idx,
                            })?
                    }
                };

                let actual = checksum_frame(runner.state(), outcome.command);
                checksum_chain = fnv1a64_pair(checksum_chain, actual);
                if actual != *expected_checksum && first_mismatch.is_none() {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        target: "storyscroll.replay",
                        frame_idx = *expected_idx,
                        expected = *expected_checksum,
                        actual,
                        "checksum mismatch"
                    );
                    first_mismatch = Some(ReplayMismatch {
                        frame_idx: *expected_idx,
                        expected: *expected_checksum,
                        actual,
                    });
                }
                replay_frame_idx += 1;
            }
            TraceRecord::Header { .. } | TraceRecord::Summary { .. } => {}
        }
    }

    Ok(ReplayResult {
        total_frames: replay_frame_idx,
        final_checksum_chain: checksum_chain,
        first_mismatch,
    })
}

// ---------------------------------------------------------------------------
// JSONL export
// ---------------------------------------------------------------------------

#[cfg(feature = "trace-json")]
mod jsonl {
    use serde_json::{Value, json};

    use super::{ReplayError, SCHEMA_VERSION, SessionTrace, TraceRecord};
    use storyscroll_core::ScrollMeasurement;

    fn record_to_value(record: &TraceRecord) -> Value {
        match record {
            TraceRecord::Header { panel_count } => json!({
                "event": "header",
                "schema_version": SCHEMA_VERSION,
                "panel_count": panel_count,
            }),
            TraceRecord::Measure { ts_ns, measurement } => json!({
                "event": "measure",
                "ts_ns": ts_ns,
                "scroll_y": measurement.scroll_y,
                "section_top": measurement.section_top,
                "section_height": measurement.section_height,
                "viewport_height": measurement.viewport_height,
                "has_next_section": measurement.has_next_section,
            }),
            TraceRecord::Scroll { ts_ns } => json!({ "event": "scroll", "ts_ns": ts_ns }),
            TraceRecord::Resize { ts_ns } => json!({ "event": "resize", "ts_ns": ts_ns }),
            TraceRecord::Tick { ts_ns } => json!({ "event": "tick", "ts_ns": ts_ns }),
            TraceRecord::Mount { ts_ns } => json!({ "event": "mount", "ts_ns": ts_ns }),
            TraceRecord::Unmount { ts_ns } => json!({ "event": "unmount", "ts_ns": ts_ns }),
            TraceRecord::Frame {
                frame_idx,
                ts_ns,
                checksum,
                checksum_chain,
            } => json!({
                "event": "frame",
                "frame_idx": frame_idx,
                "ts_ns": ts_ns,
                "checksum": format!("{checksum:016x}"),
                "checksum_chain": format!("{checksum_chain:016x}"),
            }),
            TraceRecord::Summary {
                total_frames,
                final_checksum_chain,
            } => json!({
                "event": "summary",
                "total_frames": total_frames,
                "final_checksum_chain": format!("{final_checksum_chain:016x}"),
            }),
        }
    }

    struct Line<'a> {
        number: usize,
        value: &'a Value,
    }

    impl Line<'_> {
        fn err(&self, message: impl Into<String>) -> ReplayError {
            ReplayError::Parse {
                line: self.number,
                message: message.into(),
            }
        }

        fn u64(&self, key: &str) -> Result<u64, ReplayError> {
            self.value
                .get(key)
                .and_then(Value::as_u64)
                .ok_or_else(|| self.err(format!("missing integer field `{key}`")))
        }

        fn f64(&self, key: &str) -> Result<f64, ReplayError> {
            self.value
                .get(key)
                .and_then(Value::as_f64)
                .ok_or_else(|| self.err(format!("missing number field `{key}`")))
        }

        fn bool(&self, key: &str) -> Result<bool, ReplayError> {
            self.value
                .get(key)
                .and_then(Value::as_bool)
                .ok_or_else(|| self.err(format!("missing bool field `{key}`")))
        }

        fn hex(&self, key: &str) -> Result<u64, ReplayError> {
            let raw = self
                .value
                .get(key)
                .and_then(Value::as_str)
                .ok_or_else(|| self.err(format!("missing checksum field `{key}`")))?;
            u64::from_str_radix(raw, 16).map_err(|e| self.err(format!("`{key}`: {e}")))
        }
    }

    fn value_to_record(line: &Line<'_>) -> Result<TraceRecord, ReplayError> {
        let event = line
            .value
            .get("event")
            .and_then(Value::as_str)
            .ok_or_else(|| line.err("missing `event`"))?;
        Ok(match event {
            "header" => {
                let version = line.value.get("schema_version").and_then(Value::as_str);
                if version != Some(SCHEMA_VERSION) {
                    return Err(line.err(format!("unsupported schema {version:?}")));
                }
                let raw = line.u64("panel_count")?;
                let panel_count = usize::try_from(raw)
                    .map_err(|_| line.err(format!("`panel_count` {raw} exceeds usize")))?;
                TraceRecord::Header { panel_count }
            }
            "measure" => TraceRecord::Measure {
                ts_ns: line.u64("ts_ns")?,
                measurement: ScrollMeasurement {
                    scroll_y: line.f64("scroll_y")?,
                    section_top: line.f64("section_top")?,
                    section_height: line.f64("section_height")?,
                    viewport_height: line.f64("viewport_height")?,
                    has_next_section: line.bool("has_next_section")?,
                },
            },
            "scroll" => TraceRecord::Scroll {
                ts_ns: line.u64("ts_ns")?,
            },
            "resize" => TraceRecord::Resize {
                ts_ns: line.u64("ts_ns")?,
            },
            "tick" => TraceRecord::Tick {
                ts_ns: line.u64("ts_ns")?,
            },
            "mount" => TraceRecord::Mount {
                ts_ns: line.u64("ts_ns")?,
            },
            "unmount" => TraceRecord::Unmount {
                ts_ns: line.u64("ts_ns")?,
            },
            "frame" => TraceRecord::Frame {
                frame_idx: line.u64("frame_idx")?,
                ts_ns: line.u64("ts_ns")?,
                checksum: line.hex("checksum")?,
                checksum_chain: line.hex("checksum_chain")?,
            },
            "summary" => TraceRecord::Summary {
                total_frames: line.u64("total_frames")?,
                final_checksum_chain: line.hex("final_checksum_chain")?,
            },
            other => return Err(line.err(format!("unknown event `{other}`"))),
        })
    }

    impl SessionTrace {
        /// One JSON object per line, in record order.
        #[must_use]
        pub fn to_jsonl(&self) -> String {
            let mut out = String::new();
            for record in &self.records {
                out.push_str(&record_to_value(record).to_string());
                out.push('\n');
            }
            out
        }

        /// Parse the output of [`to_jsonl`](Self::to_jsonl). Blank lines are
        /// skipped; line numbers in errors are 1-based.
        pub fn from_jsonl(input: &str) -> Result<Self, ReplayError> {
            let mut records = Vec::new();
            for (i, raw) in input.lines().enumerate() {
                if raw.trim().is_empty() {
                    continue;
                }
                let value: Value = serde_json::from_str(raw).map_err(|e| ReplayError::Parse {
                    line: i + 1,
                    message: e.to_string(),
                })?;
                records.push(value_to_record(&Line {
                    number: i + 1,
                    value: &value,
                })?);
            }
            Ok(Self { records })
        }
    }
}
