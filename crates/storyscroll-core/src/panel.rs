#![forbid(unsafe_code)]

//! Panel content records and the immutable, non-empty [`PanelSet`].

#[cfg(feature = "policy-config")]
use serde::{Deserialize, Serialize};

/// One content panel shown while the section is pinned.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
pub struct Panel {
    pub title: String,
    pub body: String,
    #[cfg_attr(feature = "policy-config", serde(default))]
    pub bullets: Vec<String>,
    /// Optional image reference (URL or asset path).
    #[cfg_attr(feature = "policy-config", serde(default))]
    pub image: Option<String>,
}

impl Panel {
    /// Create a panel with no bullets and no image.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            bullets: Vec::new(),
            image: None,
        }
    }

    /// Append a bullet line (builder pattern).
    #[must_use]
    pub fn bullet(mut self, bullet: impl Into<String>) -> Self {
        self.bullets.push(bullet.into());
        self
    }

    /// Set the image reference (builder pattern).
    #[must_use]
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Error building a [`PanelSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelSetError {
    /// A navigator needs at least one panel.
    Empty,
}

impl core::fmt::Display for PanelSetError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty => write!(f, "panel set must contain at least one panel"),
        }
    }
}

impl std::error::Error for PanelSetError {}

/// Ordered panels, fixed for the navigator's lifetime.
///
/// Never empty, so `len() - 1` is always a valid index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSet {
    panels: Vec<Panel>,
}

impl PanelSet {
    /// Build a panel set, rejecting an empty list.
    pub fn new(panels: Vec<Panel>) -> Result<Self, PanelSetError> {
        if panels.is_empty() {
            return Err(PanelSetError::Empty);
        }
        Ok(Self { panels })
    }

    /// Number of panels (always `>= 1`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Always `false`; present for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.panels.len() - 1
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Panel> {
        self.panels.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Panel] {
        &self.panels
    }
}

impl TryFrom<Vec<Panel>> for PanelSet {
    type Error = PanelSetError;

    fn try_from(panels: Vec<Panel>) -> Result<Self, Self::Error> {
        Self::new(panels)
    }
}
