//! Sizing units and their resolution to pixels
//!
//! A sizing value is written in suffix notation: `100` or `100px` (absolute),
//! `2rem` (root relative), `50pw` / `50ph` (percent of the parent width or
//! height), `2*` (weighted share of a stack's remaining space) and `auto`
//! (a theme default). A bare `%` takes the axis of the attribute it is
//! written on.

use std::fmt;

use thiserror::Error;

use super::theme::ThemeMetrics;
use super::types::Axis;

/// Errors produced while parsing a sizing value
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SizingParseError {
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("unknown sizing unit '{0}'")]
    UnknownUnit(String),

    #[error("remainder weight must not be negative")]
    NegativeWeight,
}

/// A width or height before resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sizing {
    /// Pixels
    Absolute(f64),
    /// Multiplier of the theme's root font size
    RootRelative(f64),
    /// Percentage of the parent width
    PercentWidth(f64),
    /// Percentage of the parent height
    PercentHeight(f64),
    /// Weighted share of the space left over inside a stack
    Star(f64),
    /// Theme default
    Auto,
}

impl Default for Sizing {
    fn default() -> Self {
        Sizing::Auto
    }
}

impl Sizing {
    /// Parse a sizing value written on an attribute of the given axis
    pub fn parse(input: &str, axis: Axis) -> Result<Self, SizingParseError> {
        let text = input.trim();
        if text.eq_ignore_ascii_case("auto") {
            return Ok(Sizing::Auto);
        }
        if text == "*" {
            return Ok(Sizing::Star(1.0));
        }

        let split = text
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(text.len());
        let (number, unit) = text.split_at(split);
        let value: f64 = number
            .parse()
            .map_err(|_| SizingParseError::InvalidNumber(text.to_string()))?;

        match unit.to_ascii_lowercase().as_str() {
            "" | "px" => Ok(Sizing::Absolute(value)),
            "rem" => Ok(Sizing::RootRelative(value)),
            "pw" => Ok(Sizing::PercentWidth(value)),
            "ph" => Ok(Sizing::PercentHeight(value)),
            "%" => Ok(match axis {
                Axis::Horizontal => Sizing::PercentWidth(value),
                Axis::Vertical => Sizing::PercentHeight(value),
            }),
            "*" if value < 0.0 => Err(SizingParseError::NegativeWeight),
            "*" => Ok(Sizing::Star(value)),
            other => Err(SizingParseError::UnknownUnit(other.to_string())),
        }
    }

    /// Weight of a remainder unit, if this is one
    pub fn star_weight(&self) -> Option<f64> {
        match self {
            Sizing::Star(weight) => Some(*weight),
            _ => None,
        }
    }
}

impl fmt::Display for Sizing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sizing::Absolute(v) => write!(f, "{}px", v),
            Sizing::RootRelative(v) => write!(f, "{}rem", v),
            Sizing::PercentWidth(v) => write!(f, "{}pw", v),
            Sizing::PercentHeight(v) => write!(f, "{}ph", v),
            Sizing::Star(v) => write!(f, "{}*", v),
            Sizing::Auto => write!(f, "auto"),
        }
    }
}

/// Resolve one sizing value to pixels.
///
/// Percentages use the same formula on both axes; the caller picks which
/// parent extent to pass. `Auto` yields the theme's default control height.
/// Remainder units need sibling accounting and resolve to 0 here; the stack
/// arrangement in the layout engine is the only place that gives them space.
pub fn resolve(sizing: Sizing, parent_extent: f64, theme: &ThemeMetrics) -> f64 {
    match sizing {
        Sizing::Absolute(px) => px,
        Sizing::RootRelative(multiplier) => multiplier * theme.root_font_size,
        Sizing::PercentWidth(pct) | Sizing::PercentHeight(pct) => pct / 100.0 * parent_extent,
        Sizing::Auto => theme.default_control_height,
        Sizing::Star(_) => 0.0,
    }
}
