//! Core types for the layout engine

/// One of the two layout axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The perpendicular axis
    pub fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Pick the value that belongs to this axis
    pub fn select(self, horizontal: f64, vertical: f64) -> f64 {
        match self {
            Axis::Horizontal => horizontal,
            Axis::Vertical => vertical,
        }
    }

    /// Order an (along, across) pair as (horizontal, vertical)
    pub fn compose(self, along: f64, across: f64) -> (f64, f64) {
        match self {
            Axis::Horizontal => (along, across),
            Axis::Vertical => (across, along),
        }
    }
}

/// A rectangle in pixels, computed by a layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if this rectangle contains a point.
    ///
    /// The left and top edges are inside, the right and bottom edges are not.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Origin of the rectangle along an axis
    pub fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Size of the rectangle along an axis
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Shift the rectangle by an offset
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Shrink the rectangle by four edge amounts, never below zero size
    pub fn inset(&self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self::new(
            self.x + left,
            self.y + top,
            (self.width - left - right).max(0.0),
            (self.height - top - bottom).max(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = LayoutRect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
    }

    #[test]
    fn test_contains_is_half_open() {
        let rect = LayoutRect::new(0.0, 0.0, 100.0, 100.0);
        assert!(rect.contains(0.0, 0.0));
        assert!(rect.contains(99.0, 99.0));
        assert!(!rect.contains(100.0, 50.0));
        assert!(!rect.contains(50.0, 100.0));
        assert!(!rect.contains(-0.5, 10.0));
    }

    #[test]
    fn test_inset_clamps_to_zero() {
        let rect = LayoutRect::new(0.0, 0.0, 10.0, 10.0);
        let inner = rect.inset(2.0, 20.0, 3.0, 1.0);
        assert_eq!(inner.x, 1.0);
        assert_eq!(inner.y, 2.0);
        assert_eq!(inner.width, 0.0);
        assert_eq!(inner.height, 5.0);
    }

    #[test]
    fn test_axis_compose() {
        assert_eq!(Axis::Horizontal.compose(1.0, 2.0), (1.0, 2.0));
        assert_eq!(Axis::Vertical.compose(1.0, 2.0), (2.0, 1.0));
        assert_eq!(Axis::Vertical.cross(), Axis::Horizontal);
    }
}
