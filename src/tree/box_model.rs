//! Box model: margin, padding, border and sizing of one element

use std::str::FromStr;

use crate::layout::{Axis, Sizing};

/// Four independent edge magnitudes.
///
/// Used for margin, padding and border width alike. Written in markup as
/// `a`, `vertical,horizontal` or `top,right,bottom,left`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spacing {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Spacing {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Same magnitude on every edge
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Vertical magnitude on top and bottom, horizontal on left and right
    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    /// left + right
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// top + bottom
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// Sum of both edges across an axis
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.horizontal(),
            Axis::Vertical => self.vertical(),
        }
    }

    /// Left or top edge
    pub fn leading(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }
}

/// Spacing text did not contain 1, 2 or 4 numbers
#[derive(Debug, Clone, PartialEq)]
pub struct SpacingParseError;

impl FromStr for Spacing {
    type Err = SpacingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|part| {
                let part = part.trim();
                let part = part.strip_suffix("px").unwrap_or(part);
                part.trim().parse::<f64>().map_err(|_| SpacingParseError)
            })
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [all] => Ok(Spacing::uniform(*all)),
            [vertical, horizontal] => Ok(Spacing::symmetric(*vertical, *horizontal)),
            [top, right, bottom, left] => Ok(Spacing::new(*top, *right, *bottom, *left)),
            _ => Err(SpacingParseError),
        }
    }
}

/// Sizing and spacing of one element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxModel {
    pub margin: Spacing,
    pub padding: Spacing,
    pub border: Spacing,
    pub width: Sizing,
    pub height: Sizing,
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    pub min_height: Option<f64>,
    pub max_height: Option<f64>,
}

impl BoxModel {
    /// Sizing value for an axis
    pub fn sizing(&self, axis: Axis) -> Sizing {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Apply the min then max constraint for an axis.
    ///
    /// The result is never negative.
    pub fn constrain(&self, axis: Axis, extent: f64) -> f64 {
        let (min, max) = match axis {
            Axis::Horizontal => (self.min_width, self.max_width),
            Axis::Vertical => (self.min_height, self.max_height),
        };
        let mut extent = extent;
        if let Some(min) = min {
            extent = extent.max(min);
        }
        if let Some(max) = max {
            extent = extent.min(max);
        }
        extent.max(0.0)
    }
}
