#![forbid(unsafe_code)]

//! Policy-as-data configuration for the story scroll.
//!
//! Every tuning constant of the navigator lives here so it can be adjusted
//! without recompiling. With the `policy-config` feature enabled, a whole
//! [`StoryConfig`] (tuning plus panel content) loads from TOML or JSON.
//!
//! # Loading
//!
//! ```toml
//! # storyscroll.toml
//! [navigator]
//! snap_back_threshold_px = 360.0
//! snap_cooldown_ms = 600
//! auto_advance_progress = 0.98
//!
//! [[panels]]
//! title = "Custom Websites"
//! body = "Fast, conversion-first sites."
//! bullets = ["Landing pages", "SEO foundations"]
//! ```
//!
//! ```rust,ignore
//! let story = StoryConfig::from_toml_file("storyscroll.toml")?;
//! let navigator = Navigator::new(story.panel_set()?, story.navigator);
//! ```
//!
//! # Defaults
//!
//! Defaults are the empirically chosen values of the production site: a
//! 360 px snap-back zone, a 600 ms snap cooldown, auto-advance at 98 %
//! progress, and 400 ms / 20 px panel transitions.

use core::time::Duration;

#[cfg(feature = "policy-config")]
use std::path::Path;

#[cfg(feature = "policy-config")]
use serde::{Deserialize, Serialize};

use crate::panel::{Panel, PanelSet, PanelSetError};

// ---------------------------------------------------------------------------
// Navigator tuning
// ---------------------------------------------------------------------------

/// Tuning for scroll tracking and boundary handling.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct NavigatorConfig {
    /// Distance below the pinned region's bottom edge within which an upward
    /// scroll snaps back to the section start.
    pub snap_back_threshold_px: f64,

    /// Window after a snap-back during which no further snap may fire.
    pub snap_cooldown_ms: u64,

    /// Progress at or above which a downward scroll on the last panel
    /// auto-advances to the next section.
    pub auto_advance_progress: f64,

    /// Panel enter/exit transition timing.
    pub transition: TransitionConfig,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            snap_back_threshold_px: 360.0,
            snap_cooldown_ms: 600,
            auto_advance_progress: 0.98,
            transition: TransitionConfig::default(),
        }
    }
}

impl NavigatorConfig {
    #[must_use]
    pub fn snap_cooldown(&self) -> Duration {
        Duration::from_millis(self.snap_cooldown_ms)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.snap_back_threshold_px.is_finite() || self.snap_back_threshold_px < 0.0 {
            errors.push(format!(
                "navigator.snap_back_threshold_px must be finite and >= 0, got {}",
                self.snap_back_threshold_px
            ));
        }

        if !(self.auto_advance_progress > 0.0 && self.auto_advance_progress <= 1.0) {
            errors.push(format!(
                "navigator.auto_advance_progress must be in (0, 1], got {}",
                self.auto_advance_progress
            ));
        }

        errors.extend(self.transition.validate());
        errors
    }
}

/// Panel content transition timing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct TransitionConfig {
    /// Duration of both the exit and the enter animation.
    pub duration_ms: u64,
    /// Vertical travel: entering panels rise from `+offset_px`, exiting
    /// panels leave toward `-offset_px`.
    pub offset_px: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: 400,
            offset_px: 20.0,
        }
    }
}

impl TransitionConfig {
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.offset_px.is_finite() {
            errors.push(format!(
                "transition.offset_px must be finite, got {}",
                self.offset_px
            ));
        }
        errors
    }
}

// ---------------------------------------------------------------------------
// Reveal / header tuning
// ---------------------------------------------------------------------------

/// In-view reveal tracking for sections that animate in on first sight.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct RevealConfig {
    /// Visible fraction of the element required to count as in view.
    pub threshold: f64,
    /// Stop tracking after the first time the element comes into view.
    pub trigger_once: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            trigger_once: false,
        }
    }
}

impl RevealConfig {
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(0.0..=1.0).contains(&self.threshold) {
            errors.push(format!(
                "reveal.threshold must be in [0, 1], got {}",
                self.threshold
            ));
        }
        errors
    }
}

/// Page header "scrolled" styling threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct HeaderConfig {
    /// Scroll offset beyond which the header switches to its scrolled style.
    pub scrolled_threshold_px: f64,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            scrolled_threshold_px: 20.0,
        }
    }
}

impl HeaderConfig {
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.scrolled_threshold_px.is_finite() || self.scrolled_threshold_px < 0.0 {
            errors.push(format!(
                "header.scrolled_threshold_px must be finite and >= 0, got {}",
                self.scrolled_threshold_px
            ));
        }
        errors
    }
}

// ---------------------------------------------------------------------------
// StoryConfig
// ---------------------------------------------------------------------------

/// Everything needed to mount one story scroll section.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct StoryConfig {
    pub navigator: NavigatorConfig,
    pub reveal: RevealConfig,
    pub header: HeaderConfig,
    /// Panel content in display order.
    pub panels: Vec<Panel>,
}

impl StoryConfig {
    /// Load from a TOML string.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to a pretty TOML string.
    #[cfg(feature = "policy-config")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::TomlSer)
    }

    /// Validate every section. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.navigator.validate();
        errors.extend(self.reveal.validate());
        errors.extend(self.header.validate());
        errors
    }

    /// Return `self` if [`validate`](Self::validate) reports nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Build the immutable panel set for a navigator.
    pub fn panel_set(&self) -> Result<PanelSet, ConfigError> {
        PanelSet::new(self.panels.clone()).map_err(ConfigError::Panels)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from loading or validating a [`StoryConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "policy-config")]
    Toml(toml::de::Error),
    /// TOML serialization error.
    #[cfg(feature = "policy-config")]
    TomlSer(toml::ser::Error),
    /// JSON parse error.
    #[cfg(feature = "policy-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
    /// Unusable panel list.
    Panels(PanelSetError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::TomlSer(e) => write!(f, "TOML serialize error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
            Self::Panels(e) => write!(f, "panels: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::TomlSer(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
            Self::Panels(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_production_tuning() {
        let config = NavigatorConfig::default();
        assert_eq!(config.snap_back_threshold_px, 360.0);
        assert_eq!(config.snap_cooldown(), Duration::from_millis(600));
        assert_eq!(config.auto_advance_progress, 0.98);
        assert_eq!(config.transition.duration(), Duration::from_millis(400));
        assert_eq!(config.transition.offset_px, 20.0);
        assert_eq!(RevealConfig::default().threshold, 0.1);
        assert_eq!(HeaderConfig::default().scrolled_threshold_px, 20.0);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(StoryConfig::default().validate().is_empty());
    }

    #[test]
    fn invalid_values_reported() {
        let config = StoryConfig {
            navigator: NavigatorConfig {
                snap_back_threshold_px: -1.0,
                auto_advance_progress: 1.5,
                transition: TransitionConfig {
                    offset_px: f64::NAN,
                    ..TransitionConfig::default()
                },
                ..NavigatorConfig::default()
            },
            reveal: RevealConfig {
                threshold: 2.0,
                trigger_once: true,
            },
            header: HeaderConfig {
                scrolled_threshold_px: f64::INFINITY,
            },
            panels: Vec::new(),
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 5, "{errors:?}");
        let err = config.validated().unwrap_err();
        assert!(err.to_string().starts_with("validation errors: "));
    }

    #[test]
    fn zero_progress_threshold_rejected() {
        let config = NavigatorConfig {
            auto_advance_progress: 0.0,
            ..NavigatorConfig::default()
        };
        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn empty_panels_rejected_by_panel_set() {
        let err = StoryConfig::default().panel_set().unwrap_err();
        assert!(matches!(err, ConfigError::Panels(PanelSetError::Empty)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[cfg(feature = "policy-config")]
    mod loading {
        use super::*;
        use std::io::Write;

        const STORY_TOML: &str = r#"
[navigator]
snap_back_threshold_px = 240.0
snap_cooldown_ms = 900

[navigator.transition]
duration_ms = 250

[reveal]
trigger_once = true

[[panels]]
title = "Custom Websites"
body = "Fast sites."
bullets = ["Landing pages", "SEO"]

[[panels]]
title = "CRM Workflows"
body = "Lead routing."
image = "/crm.png"
"#;

        #[test]
        fn toml_partial_sections_keep_defaults() {
            let story = StoryConfig::from_toml_str(STORY_TOML).unwrap();
            assert_eq!(story.navigator.snap_back_threshold_px, 240.0);
            assert_eq!(story.navigator.snap_cooldown_ms, 900);
            assert_eq!(story.navigator.auto_advance_progress, 0.98);
            assert_eq!(story.navigator.transition.duration_ms, 250);
            assert_eq!(story.navigator.transition.offset_px, 20.0);
            assert!(story.reveal.trigger_once);
            assert_eq!(story.reveal.threshold, 0.1);
            let panels = story.panel_set().unwrap();
            assert_eq!(panels.len(), 2);
            assert!(panels.get(0).unwrap().image.is_none());
            assert_eq!(panels.get(1).unwrap().bullets.len(), 0);
        }

        #[test]
        fn json_round_trip_through_toml() {
            let story = StoryConfig::from_toml_str(STORY_TOML).unwrap();
            let toml_text = story.to_toml_string().unwrap();
            assert_eq!(StoryConfig::from_toml_str(&toml_text).unwrap(), story);

            let json = r#"{"navigator":{"auto_advance_progress":0.9},"panels":[{"title":"t","body":"b"}]}"#;
            let story = StoryConfig::from_json_str(json).unwrap();
            assert_eq!(story.navigator.auto_advance_progress, 0.9);
            assert_eq!(story.panels.len(), 1);
        }

        #[test]
        fn invalid_toml_values_fail_validation() {
            let err = StoryConfig::from_toml_str("[navigator]\nauto_advance_progress = 3.0\n")
                .unwrap_err();
            assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
        }

        #[test]
        fn malformed_inputs_report_parser() {
            assert!(matches!(
                StoryConfig::from_toml_str("[navigator"),
                Err(ConfigError::Toml(_))
            ));
            assert!(matches!(
                StoryConfig::from_json_str("{"),
                Err(ConfigError::Json(_))
            ));
        }

        #[test]
        fn loads_from_files() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            file.write_all(STORY_TOML.as_bytes()).unwrap();
            let story = StoryConfig::from_toml_file(file.path()).unwrap();
            assert_eq!(story.panels.len(), 2);

            let missing = StoryConfig::from_json_file(file.path().with_extension("missing"));
            assert!(matches!(missing, Err(ConfigError::Io(_))));
        }
    }
}
