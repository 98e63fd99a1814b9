//! Whiteboard entity: a resizable rectangular workspace region.
//!
//! A whiteboard does not own anything. Nodes and labels count as "inside" it
//! purely by where their position point lies.

use super::{EntityId, EntityTrait};
use crate::geometry::{rect_contains, rects_overlap};
use crate::style::PaletteColor;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum whiteboard width enforced while resizing.
pub const MIN_WHITEBOARD_WIDTH: f64 = 400.0;
/// Minimum whiteboard height enforced while resizing.
pub const MIN_WHITEBOARD_HEIGHT: f64 = 300.0;
/// Top-left corner of the whiteboard every fresh scene starts with.
pub const DEFAULT_WHITEBOARD_POSITION: Point = Point::new(-800.0, -600.0);
pub const DEFAULT_WHITEBOARD_WIDTH: f64 = 1600.0;
pub const DEFAULT_WHITEBOARD_HEIGHT: f64 = 1200.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// One of the eight resize handles of a whiteboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    Corner(Corner),
    Edge(Edge),
}

impl ResizeHandle {
    /// All handles, corners first.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Corner(Corner::TopLeft),
        ResizeHandle::Corner(Corner::TopRight),
        ResizeHandle::Corner(Corner::BottomLeft),
        ResizeHandle::Corner(Corner::BottomRight),
        ResizeHandle::Edge(Edge::Top),
        ResizeHandle::Edge(Edge::Right),
        ResizeHandle::Edge(Edge::Bottom),
        ResizeHandle::Edge(Edge::Left),
    ];

    /// Which sides this handle drags: (left, top, right, bottom).
    fn sides(&self) -> (bool, bool, bool, bool) {
        match self {
            ResizeHandle::Corner(Corner::TopLeft) => (true, true, false, false),
            ResizeHandle::Corner(Corner::TopRight) => (false, true, true, false),
            ResizeHandle::Corner(Corner::BottomLeft) => (true, false, false, true),
            ResizeHandle::Corner(Corner::BottomRight) => (false, false, true, true),
            ResizeHandle::Edge(Edge::Top) => (false, true, false, false),
            ResizeHandle::Edge(Edge::Right) => (false, false, true, false),
            ResizeHandle::Edge(Edge::Bottom) => (false, false, false, true),
            ResizeHandle::Edge(Edge::Left) => (true, false, false, false),
        }
    }
}

fn default_background() -> PaletteColor {
    PaletteColor::White
}

/// A rectangular workspace region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Whiteboard {
    pub(crate) id: EntityId,
    /// Top-left corner position.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_background")]
    pub background_color: PaletteColor,
    #[serde(skip)]
    pub selected: bool,
}

impl Whiteboard {
    /// Create a new whiteboard.
    pub fn new(id: EntityId, position: Point, width: f64, height: f64) -> Self {
        Self {
            id,
            position,
            width,
            height,
            background_color: default_background(),
            selected: false,
        }
    }

    /// A whiteboard with the fixed default bounds.
    pub fn with_default_bounds(id: EntityId) -> Self {
        Self::new(
            id,
            DEFAULT_WHITEBOARD_POSITION,
            DEFAULT_WHITEBOARD_WIDTH,
            DEFAULT_WHITEBOARD_HEIGHT,
        )
    }

    /// Copy of this frame under a new id, shifted by `offset`.
    pub fn duplicate(&self, id: EntityId, offset: Vec2) -> Self {
        Self {
            id,
            position: self.position + offset,
            selected: false,
            ..self.clone()
        }
    }

    /// Check whether a point lies inside the frame (edges included).
    pub fn contains(&self, point: Point) -> bool {
        rect_contains(self.bounds(), point)
    }

    /// Handle positions in world coordinates.
    pub fn handles(&self) -> [(ResizeHandle, Point); 8] {
        let b = self.bounds();
        let c = b.center();
        ResizeHandle::ALL.map(|handle| {
            let point = match handle {
                ResizeHandle::Corner(Corner::TopLeft) => Point::new(b.x0, b.y0),
                ResizeHandle::Corner(Corner::TopRight) => Point::new(b.x1, b.y0),
                ResizeHandle::Corner(Corner::BottomLeft) => Point::new(b.x0, b.y1),
                ResizeHandle::Corner(Corner::BottomRight) => Point::new(b.x1, b.y1),
                ResizeHandle::Edge(Edge::Top) => Point::new(c.x, b.y0),
                ResizeHandle::Edge(Edge::Right) => Point::new(b.x1, c.y),
                ResizeHandle::Edge(Edge::Bottom) => Point::new(c.x, b.y1),
                ResizeHandle::Edge(Edge::Left) => Point::new(b.x0, c.y),
            };
            (handle, point)
        })
    }

    /// Find the handle whose square of half-size `half_size` contains `point`.
    pub fn hit_test_handle(&self, point: Point, half_size: f64) -> Option<ResizeHandle> {
        self.handles()
            .into_iter()
            .find(|(_, p)| (point.x - p.x).abs() <= half_size && (point.y - p.y).abs() <= half_size)
            .map(|(handle, _)| handle)
    }

    /// Drag one handle by `delta`.
    ///
    /// Width and height never drop below the minimum; when a left or top side
    /// hits the minimum the opposite side stays where it was.
    pub fn resize(&mut self, handle: ResizeHandle, delta: Vec2) {
        let (left, top, right, bottom) = handle.sides();
        let right_edge = self.position.x + self.width;
        let bottom_edge = self.position.y + self.height;

        if left {
            self.width = (self.width - delta.x).max(MIN_WHITEBOARD_WIDTH);
            self.position.x = right_edge - self.width;
        } else if right {
            self.width = (self.width + delta.x).max(MIN_WHITEBOARD_WIDTH);
        }

        if top {
            self.height = (self.height - delta.y).max(MIN_WHITEBOARD_HEIGHT);
            self.position.y = bottom_edge - self.height;
        } else if bottom {
            self.height = (self.height + delta.y).max(MIN_WHITEBOARD_HEIGHT);
        }
    }
}

impl EntityTrait for Whiteboard {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn position(&self) -> Point {
        self.position
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.width, self.height))
    }

    fn hit_test(&self, point: Point) -> bool {
        self.contains(point)
    }

    fn intersects_rect(&self, rect: Rect) -> bool {
        rects_overlap(self.bounds(), rect)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Whiteboard {
        Whiteboard::new(EntityId::new("whiteboard-0"), Point::ZERO, 800.0, 600.0)
    }

    #[test]
    fn test_contains() {
        let wb = board();
        assert!(wb.contains(Point::new(100.0, 100.0)));
        assert!(wb.contains(Point::new(800.0, 600.0)));
        assert!(!wb.contains(Point::new(900.0, 900.0)));
    }

    #[test]
    fn test_handles_cover_corners_and_midpoints() {
        let wb = board();
        let handles = wb.handles();
        assert_eq!(handles.len(), 8);
        assert!(handles.contains(&(ResizeHandle::Edge(Edge::Right), Point::new(800.0, 300.0))));
        assert!(handles.contains(&(
            ResizeHandle::Corner(Corner::BottomRight),
            Point::new(800.0, 600.0)
        )));
    }

    #[test]
    fn test_handle_hit_test() {
        let wb = board();
        assert_eq!(
            wb.hit_test_handle(Point::new(805.0, 595.0), 6.0),
            Some(ResizeHandle::Corner(Corner::BottomRight))
        );
        assert_eq!(
            wb.hit_test_handle(Point::new(400.0, 3.0), 6.0),
            Some(ResizeHandle::Edge(Edge::Top))
        );
        assert_eq!(wb.hit_test_handle(Point::new(400.0, 300.0), 6.0), None);
    }

    #[test]
    fn test_resize_bottom_right() {
        let mut wb = board();
        wb.resize(ResizeHandle::Corner(Corner::BottomRight), Vec2::new(100.0, 50.0));
        assert!((wb.width - 900.0).abs() < f64::EPSILON);
        assert!((wb.height - 650.0).abs() < f64::EPSILON);
        assert_eq!(wb.position, Point::ZERO);
    }

    #[test]
    fn test_resize_top_left_keeps_opposite_corner() {
        let mut wb = board();
        wb.resize(ResizeHandle::Corner(Corner::TopLeft), Vec2::new(100.0, 100.0));
        assert_eq!(wb.position, Point::new(100.0, 100.0));
        assert!((wb.width - 700.0).abs() < f64::EPSILON);
        assert!((wb.height - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_clamps_to_minimum_with_anchor() {
        let mut wb = board();
        wb.resize(ResizeHandle::Edge(Edge::Left), Vec2::new(1000.0, 0.0));
        assert!((wb.width - MIN_WHITEBOARD_WIDTH).abs() < f64::EPSILON);
        // Right edge stays at x = 800
        assert!((wb.position.x + wb.width - 800.0).abs() < f64::EPSILON);

        wb.resize(ResizeHandle::Edge(Edge::Bottom), Vec2::new(0.0, -1000.0));
        assert!((wb.height - MIN_WHITEBOARD_HEIGHT).abs() < f64::EPSILON);
        assert!(wb.position.y.abs() < f64::EPSILON);
    }

    #[test]
    fn test_edge_handle_ignores_cross_axis() {
        let mut wb = board();
        wb.resize(ResizeHandle::Edge(Edge::Right), Vec2::new(50.0, 500.0));
        assert!((wb.width - 850.0).abs() < f64::EPSILON);
        assert!((wb.height - 600.0).abs() < f64::EPSILON);
    }
}
