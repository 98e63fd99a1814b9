//! Entity definitions for the diagram scene.
//!
//! Entities are plain data owned by the [`Scene`](crate::scene::Scene).
//! Cross references (an arrow's endpoints) are stored as ids and resolved
//! through the scene whenever they are used.

mod arrow;
mod node;
mod text_label;
mod whiteboard;

pub use arrow::{Arrow, ArrowGeometry, ARROW_HEAD_SIZE};
pub use node::{Node, DEFAULT_NODE_RADIUS};
pub use text_label::{TextLabel, DEFAULT_TEXT_PADDING};
pub use whiteboard::{
    Corner, Edge, ResizeHandle, Whiteboard, DEFAULT_WHITEBOARD_HEIGHT,
    DEFAULT_WHITEBOARD_POSITION, DEFAULT_WHITEBOARD_WIDTH, MIN_WHITEBOARD_HEIGHT,
    MIN_WHITEBOARD_WIDTH,
};

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four entity types a scene stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Node,
    Arrow,
    TextLabel,
    Whiteboard,
}

impl EntityKind {
    /// Prefix used in minted ids (`node-3`, `arrow-0`, ...).
    pub fn id_prefix(&self) -> &'static str {
        match self {
            EntityKind::Node => "node",
            EntityKind::Arrow => "arrow",
            EntityKind::TextLabel => "text",
            EntityKind::Whiteboard => "whiteboard",
        }
    }

    fn index(&self) -> usize {
        match self {
            EntityKind::Node => 0,
            EntityKind::Arrow => 1,
            EntityKind::TextLabel => 2,
            EntityKind::Whiteboard => 3,
        }
    }
}

/// Unique, human-inspectable entity identifier.
///
/// Ids are only unique with respect to the [`IdGenerator`] that minted them;
/// anything merged in from outside (paste, duplicate) is re-minted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wrap an existing id string (e.g. one read back from storage).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric suffix if this id has the `<prefix>-<n>` shape for `kind`.
    pub fn counter_value(&self, kind: EntityKind) -> Option<u64> {
        self.0
            .strip_prefix(kind.id_prefix())?
            .strip_prefix('-')?
            .parse()
            .ok()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Per-scene monotonic id counters, one per entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdGenerator {
    counters: [u64; 4],
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next id for `kind`.
    ///
    /// The counter stops at `u64::MAX`; callers that store ids must still
    /// check for collisions.
    pub fn next(&mut self, kind: EntityKind) -> EntityId {
        let counter = &mut self.counters[kind.index()];
        let id = EntityId(format!("{}-{}", kind.id_prefix(), counter));
        *counter = counter.checked_add(1).unwrap_or(u64::MAX);
        id
    }

    /// Advance the counter for `kind` past an id that already exists, so the
    /// next minted id cannot collide with it. Suffixes that cannot be
    /// advanced past leave the counter alone.
    pub fn observe(&mut self, kind: EntityKind, id: &EntityId) {
        let Some(next) = id.counter_value(kind).and_then(|value| value.checked_add(1)) else {
            return;
        };
        let counter = &mut self.counters[kind.index()];
        *counter = (*counter).max(next);
    }
}

/// Common behavior of the positioned entities (nodes, text labels, whiteboards).
///
/// Arrows are not positioned; their geometry is derived from their endpoint
/// nodes, see [`ArrowGeometry`].
pub trait EntityTrait {
    /// Get the unique identifier.
    fn id(&self) -> &EntityId;

    /// The entity's anchor point (node center, label or whiteboard top-left).
    fn position(&self) -> Point;

    /// Get the bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in world coordinates) hits this entity.
    fn hit_test(&self, point: Point) -> bool;

    /// Check if this entity intersects a selection rectangle.
    fn intersects_rect(&self, rect: Rect) -> bool;

    /// Move the entity by a delta.
    fn translate(&mut self, delta: Vec2);
}
