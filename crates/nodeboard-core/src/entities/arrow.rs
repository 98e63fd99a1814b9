//! Arrow entity connecting two nodes.

use super::{EntityId, Node};
use crate::geometry::{point_to_segment_dist, rect_contains};
use crate::style::{LineStyle, PaletteColor, StrokeWidth};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Length of the arrowhead strokes in world units.
pub const ARROW_HEAD_SIZE: f64 = 15.0;

/// A directed connection between two nodes.
///
/// The arrow only stores its endpoint ids; where it is drawn is derived from
/// the endpoint nodes every time through [`ArrowGeometry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrow {
    pub(crate) id: EntityId,
    #[serde(rename = "fromNodeId")]
    pub from_node: EntityId,
    #[serde(rename = "toNodeId")]
    pub to_node: EntityId,
    #[serde(default)]
    pub stroke_color: PaletteColor,
    #[serde(default)]
    pub stroke_width: StrokeWidth,
    #[serde(default)]
    pub line_style: LineStyle,
    #[serde(skip)]
    pub selected: bool,
}

impl Arrow {
    /// Create a new arrow with the default style.
    pub fn new(id: EntityId, from_node: EntityId, to_node: EntityId) -> Self {
        Self {
            id,
            from_node,
            to_node,
            stroke_color: PaletteColor::default(),
            stroke_width: StrokeWidth::default(),
            line_style: LineStyle::default(),
            selected: false,
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Check if either endpoint is the given node.
    pub fn references(&self, node_id: &EntityId) -> bool {
        &self.from_node == node_id || &self.to_node == node_id
    }

    /// Copy of this arrow under a new id, pointing at new endpoints.
    pub fn relinked(&self, id: EntityId, from_node: EntityId, to_node: EntityId) -> Self {
        Self {
            id,
            from_node,
            to_node,
            selected: false,
            ..self.clone()
        }
    }

    /// Derive the drawn geometry from the current endpoint nodes.
    pub fn geometry(&self, from: &Node, to: &Node) -> ArrowGeometry {
        ArrowGeometry::between(from, to)
    }
}

/// Drawn geometry of an arrow, derived from its endpoint nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowGeometry {
    /// Point on the source node's circle facing the target center.
    pub start: Point,
    /// Point on the target node's circle facing the source center.
    pub end: Point,
    /// Direction of travel in radians.
    pub angle: f64,
}

impl ArrowGeometry {
    /// Compute the line between two nodes' facing boundary points.
    pub fn between(from: &Node, to: &Node) -> Self {
        let start = from.boundary_point_toward(to.position);
        let end = to.boundary_point_toward(from.position);
        let dir = to.position - from.position;
        Self {
            start,
            end,
            angle: dir.y.atan2(dir.x),
        }
    }

    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Check if a point lies within `threshold` of the shaft.
    pub fn hit_test(&self, point: Point, threshold: f64) -> bool {
        point_to_segment_dist(point, self.start, self.end) <= threshold
    }

    /// Box selection test: the rectangle contains the start, the end or the
    /// midpoint. An arrow crossing the box with none of those three points
    /// inside is not selected.
    pub fn intersects_rect(&self, rect: Rect) -> bool {
        rect_contains(rect, self.start)
            || rect_contains(rect, self.end)
            || rect_contains(rect, self.midpoint())
    }

    /// The two back corners of the arrowhead at `end`.
    pub fn head_points(&self, head_size: f64) -> (Point, Point) {
        let dir = Vec2::new(self.angle.cos(), self.angle.sin());
        let perp = Vec2::new(-dir.y, dir.x);
        let back = self.end - dir * head_size;
        (back + perp * head_size * 0.5, back - perp * head_size * 0.5)
    }
}
