//! Circular node entity.

use super::{EntityId, EntityTrait};
use crate::geometry::{circle_boundary_point, circle_intersects_rect};
use crate::style::{FontFamily, NodeStyle};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Default node radius in world units.
pub const DEFAULT_NODE_RADIUS: f64 = 60.0;

fn default_radius() -> f64 {
    DEFAULT_NODE_RADIUS
}

/// A circular node with a caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub(crate) id: EntityId,
    /// Center point.
    pub position: Point,
    /// Caption drawn inside the circle.
    pub text: String,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default)]
    pub style: NodeStyle,
    #[serde(default)]
    pub font_family: FontFamily,
    /// Mirror of the scene's selection set, kept for the renderer.
    #[serde(skip)]
    pub selected: bool,
    /// Set while the node is being dragged.
    #[serde(skip)]
    pub dragging: bool,
}

impl Node {
    /// Create a new node with the default radius and style.
    pub fn new(id: EntityId, position: Point, text: impl Into<String>) -> Self {
        Self {
            id,
            position,
            text: text.into(),
            radius: DEFAULT_NODE_RADIUS,
            style: NodeStyle::default(),
            font_family: FontFamily::default(),
            selected: false,
            dragging: false,
        }
    }

    /// Copy of this node under a new id, shifted by `offset`, with transient
    /// flags cleared.
    pub fn duplicate(&self, id: EntityId, offset: Vec2) -> Self {
        Self {
            id,
            position: self.position + offset,
            selected: false,
            dragging: false,
            ..self.clone()
        }
    }

    /// Point on this node's circle facing `toward`.
    pub fn boundary_point_toward(&self, toward: Point) -> Point {
        circle_boundary_point(self.position, self.radius, toward)
    }
}

impl EntityTrait for Node {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn position(&self) -> Point {
        self.position
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x - self.radius,
            self.position.y - self.radius,
            self.position.x + self.radius,
            self.position.y + self.radius,
        )
    }

    fn hit_test(&self, point: Point) -> bool {
        point.distance(self.position) <= self.radius
    }

    fn intersects_rect(&self, rect: Rect) -> bool {
        circle_intersects_rect(self.position, self.radius, rect)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}
