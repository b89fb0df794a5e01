//! Theme metrics used as fallback resolution targets
//!
//! Themes are plain TOML tables; every key is optional:
//!
//! ```toml
//! root_font_size = 18
//! default_button_height = 44
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::types::Axis;
use crate::tree::ElementKind;

/// Errors that can occur when loading a theme
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Failed to read theme file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse theme TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Named constants consulted by the sizing resolver and layout engine
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemeMetrics {
    /// Pixel size of `1rem`
    pub root_font_size: f64,

    /// Height given to a button sized `auto` inside a flow
    pub default_button_height: f64,

    /// Height given to single-line inputs, selects and progress bars
    pub default_input_height: f64,

    /// Fallback height for any other `auto` control
    pub default_control_height: f64,

    /// Width given to `auto` children of a horizontal stack
    pub default_control_width: f64,

    /// Height of one line of text
    pub line_height: f64,

    /// Stack spacing used when `spacing=auto`
    pub default_spacing: f64,
}

impl Default for ThemeMetrics {
    fn default() -> Self {
        Self {
            root_font_size: 16.0,
            default_button_height: 40.0,
            default_input_height: 36.0,
            default_control_height: 40.0,
            default_control_width: 120.0,
            line_height: 24.0,
            default_spacing: 8.0,
        }
    }
}

impl ThemeMetrics {
    /// Create a theme with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a theme from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a theme from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ThemeError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the root font size
    pub fn with_root_font_size(mut self, size: f64) -> Self {
        self.root_font_size = size;
        self
    }

    /// Set the default button height
    pub fn with_button_height(mut self, height: f64) -> Self {
        self.default_button_height = height;
        self
    }

    /// Set the default input height
    pub fn with_input_height(mut self, height: f64) -> Self {
        self.default_input_height = height;
        self
    }

    /// Set the fallback control height
    pub fn with_control_height(mut self, height: f64) -> Self {
        self.default_control_height = height;
        self
    }

    /// Set the fallback control width
    pub fn with_control_width(mut self, width: f64) -> Self {
        self.default_control_width = width;
        self
    }

    /// Set the text line height
    pub fn with_line_height(mut self, height: f64) -> Self {
        self.line_height = height;
        self
    }

    /// Set the spacing used by `spacing=auto`
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.default_spacing = spacing;
        self
    }

    /// Extent of an `auto` sized element along the flow axis of its container.
    ///
    /// This is a role lookup, not a measurement of content.
    pub fn auto_extent(&self, kind: &ElementKind, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.default_control_width,
            Axis::Vertical => match kind {
                ElementKind::Button { .. } => self.default_button_height,
                ElementKind::Input { .. }
                | ElementKind::Select { .. }
                | ElementKind::Progress { .. } => self.default_input_height,
                ElementKind::TextArea { rows, .. } => self.line_height * f64::from(*rows),
                ElementKind::Heading { .. }
                | ElementKind::Paragraph { .. }
                | ElementKind::Label { .. }
                | ElementKind::Text { .. } => self.line_height,
                _ => self.default_control_height,
            },
        }
    }
}
