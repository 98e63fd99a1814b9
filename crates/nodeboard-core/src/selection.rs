//! Drag-to-select rectangle.

use crate::geometry::rect_from_corners;
use kurbo::{Point, Rect};

/// Minimum span (in world units, on either axis) for a box gesture to count
/// as a selection rather than a plain click.
pub const MIN_SELECTION_BOX_SPAN: f64 = 5.0;

/// Selection rectangle state for marquee selection. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionBox {
    /// Point where the gesture started.
    pub start: Point,
    /// Current pointer position.
    pub end: Point,
}

impl SelectionBox {
    /// Start a zero-sized box at `point`.
    pub fn new(point: Point) -> Self {
        Self {
            start: point,
            end: point,
        }
    }

    /// Update the moving corner.
    pub fn update(&mut self, point: Point) {
        self.end = point;
    }

    /// Get the selection rectangle as a normalized Rect.
    pub fn to_rect(&self) -> Rect {
        rect_from_corners(self.start, self.end)
    }

    pub fn width(&self) -> f64 {
        (self.end.x - self.start.x).abs()
    }

    pub fn height(&self) -> f64 {
        (self.end.y - self.start.y).abs()
    }

    /// Check if the box spans at least `threshold` on either axis.
    pub fn is_significant(&self, threshold: f64) -> bool {
        self.width() >= threshold || self.height() >= threshold
    }
}
