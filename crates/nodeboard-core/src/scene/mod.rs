//! The scene: authoritative store of every entity and of the selection.
//!
//! The scene is a passive data surface. It never decides what happens next;
//! the [`Controller`](crate::controller::Controller) and the host call into
//! it. Cross references are ids resolved through the scene at use time.

mod collection;
mod data;

pub use collection::EntityMap;
pub use data::{ClipboardData, SceneData, SCENE_VERSION};

use crate::entities::{
    Arrow, ArrowGeometry, EntityId, EntityKind, EntityTrait, IdGenerator, Node, ResizeHandle,
    TextLabel, Whiteboard,
};
use crate::error::SceneError;
use crate::selection::SelectionBox;
use crate::style::{NodeStyle, StylePatch};
use kurbo::{Point, Rect, Vec2};
use log::{debug, error, warn};
use std::collections::{HashMap, HashSet};

/// Maximum distance (world units) from an arrow shaft that still hits it.
pub const ARROW_HIT_THRESHOLD: f64 = 10.0;
/// Offset applied to duplicated and pasted entities.
pub const DUPLICATE_OFFSET: f64 = 20.0;
/// Horizontal gap between a whiteboard and its duplicate.
pub const WHITEBOARD_GAP: f64 = 100.0;
/// Caption of the node in [`Scene::starter`].
pub const STARTER_NODE_TEXT: &str = "Start here";

/// A typed reference to an entity in the scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl ElementRef {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }
}

/// The diagram: four keyed collections plus the selection set.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: EntityMap<Node>,
    arrows: EntityMap<Arrow>,
    text_labels: EntityMap<TextLabel>,
    whiteboards: EntityMap<Whiteboard>,
    /// Selected ids in selection order. Entity `selected` flags mirror this.
    selection: Vec<EntityId>,
    ids: IdGenerator,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene holding only the default whiteboard.
    pub fn new() -> Self {
        let mut scene = Self {
            nodes: EntityMap::new(),
            arrows: EntityMap::new(),
            text_labels: EntityMap::new(),
            whiteboards: EntityMap::new(),
            selection: Vec::new(),
            ids: IdGenerator::new(),
        };
        scene.add_default_whiteboard();
        scene
    }

    /// The scene a new board opens with: the default whiteboard and a single
    /// "Start here" node.
    pub fn starter() -> Self {
        let mut scene = Self::new();
        scene.create_node(Point::new(0.0, 150.0), STARTER_NODE_TEXT);
        scene
    }

    /// Mint an id for `kind` that no entity in the scene uses yet.
    fn mint_id(&mut self, kind: EntityKind) -> EntityId {
        loop {
            let id = self.ids.next(kind);
            if !self.contains(&id) {
                return id;
            }
            debug!("Id {} already taken, minting another", id);
        }
    }

    fn add_default_whiteboard(&mut self) -> EntityId {
        let id = self.mint_id(EntityKind::Whiteboard);
        self.whiteboards
            .insert(id.clone(), Whiteboard::with_default_bounds(id.clone()));
        id
    }

    // --- Insertion ---------------------------------------------------------

    /// Insert a node. The caller guarantees the id is unique.
    pub fn add_node(&mut self, mut node: Node) {
        self.ids.observe(EntityKind::Node, &node.id);
        node.selected = self.selection.contains(&node.id);
        self.nodes.insert(node.id.clone(), node);
    }

    /// Insert an arrow. The caller guarantees both endpoints exist.
    pub fn add_arrow(&mut self, mut arrow: Arrow) {
        self.ids.observe(EntityKind::Arrow, &arrow.id);
        arrow.selected = self.selection.contains(&arrow.id);
        self.arrows.insert(arrow.id.clone(), arrow);
    }

    pub fn add_text_label(&mut self, mut label: TextLabel) {
        self.ids.observe(EntityKind::TextLabel, &label.id);
        label.selected = self.selection.contains(&label.id);
        self.text_labels.insert(label.id.clone(), label);
    }

    pub fn add_whiteboard(&mut self, mut whiteboard: Whiteboard) {
        self.ids.observe(EntityKind::Whiteboard, &whiteboard.id);
        whiteboard.selected = self.selection.contains(&whiteboard.id);
        self.whiteboards.insert(whiteboard.id.clone(), whiteboard);
    }

    /// Create a node with a freshly minted id.
    pub fn create_node(&mut self, position: Point, text: impl Into<String>) -> EntityId {
        let id = self.mint_id(EntityKind::Node);
        self.nodes.insert(id.clone(), Node::new(id.clone(), position, text));
        id
    }

    /// Connect two nodes. Refuses self-loops and unknown endpoints.
    pub fn create_arrow(&mut self, from: &EntityId, to: &EntityId) -> Option<EntityId> {
        if from == to {
            warn!("Refusing to create self-referential arrow on {}", from);
            return None;
        }
        if !self.nodes.contains(from) || !self.nodes.contains(to) {
            warn!("Refusing to create arrow {} -> {}: missing endpoint", from, to);
            return None;
        }
        let id = self.mint_id(EntityKind::Arrow);
        self.arrows
            .insert(id.clone(), Arrow::new(id.clone(), from.clone(), to.clone()));
        Some(id)
    }

    pub fn create_text_label(&mut self, position: Point, text: impl Into<String>) -> EntityId {
        let id = self.mint_id(EntityKind::TextLabel);
        self.text_labels
            .insert(id.clone(), TextLabel::new(id.clone(), position, text));
        id
    }

    pub fn create_whiteboard(&mut self, position: Point, width: f64, height: f64) -> EntityId {
        let id = self.mint_id(EntityKind::Whiteboard);
        self.whiteboards
            .insert(id.clone(), Whiteboard::new(id.clone(), position, width, height));
        id
    }

    // --- Removal -----------------------------------------------------------

    /// Delete a node and every arrow that references it.
    pub fn remove_node(&mut self, id: &EntityId) -> Option<Node> {
        let node = self.nodes.remove(id)?;
        let dangling: Vec<EntityId> = self
            .arrows
            .iter()
            .filter(|arrow| arrow.references(id))
            .map(|arrow| arrow.id.clone())
            .collect();
        for arrow_id in &dangling {
            self.arrows.remove(arrow_id);
        }
        self.selection
            .retain(|selected| selected != id && !dangling.contains(selected));
        Some(node)
    }

    pub fn remove_arrow(&mut self, id: &EntityId) -> Option<Arrow> {
        let arrow = self.arrows.remove(id)?;
        self.selection.retain(|selected| selected != id);
        Some(arrow)
    }

    pub fn remove_text_label(&mut self, id: &EntityId) -> Option<TextLabel> {
        let label = self.text_labels.remove(id)?;
        self.selection.retain(|selected| selected != id);
        Some(label)
    }

    /// Delete a whiteboard frame. Its contents stay where they are.
    ///
    /// The last whiteboard is never removed.
    pub fn remove_whiteboard(&mut self, id: &EntityId) -> Option<Whiteboard> {
        if !self.whiteboards.contains(id) {
            return None;
        }
        if self.whiteboards.len() <= 1 {
            warn!("Cannot delete the last whiteboard ({})", id);
            return None;
        }
        let whiteboard = self.whiteboards.remove(id)?;
        self.selection.retain(|selected| selected != id);
        Some(whiteboard)
    }

    /// Remove any entity by id, applying the type's cascade rules.
    pub fn remove(&mut self, id: &EntityId) -> bool {
        match self.kind_of(id) {
            Some(EntityKind::Node) => self.remove_node(id).is_some(),
            Some(EntityKind::Arrow) => self.remove_arrow(id).is_some(),
            Some(EntityKind::TextLabel) => self.remove_text_label(id).is_some(),
            Some(EntityKind::Whiteboard) => self.remove_whiteboard(id).is_some(),
            None => false,
        }
    }

    /// Empty the scene, leaving one default whiteboard.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.arrows.clear();
        self.text_labels.clear();
        self.whiteboards.clear();
        self.selection.clear();
        self.add_default_whiteboard();
    }

    // --- Lookup ------------------------------------------------------------

    pub fn node(&self, id: &EntityId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &EntityId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn arrow(&self, id: &EntityId) -> Option<&Arrow> {
        self.arrows.get(id)
    }

    pub fn arrow_mut(&mut self, id: &EntityId) -> Option<&mut Arrow> {
        self.arrows.get_mut(id)
    }

    pub fn text_label(&self, id: &EntityId) -> Option<&TextLabel> {
        self.text_labels.get(id)
    }

    pub fn text_label_mut(&mut self, id: &EntityId) -> Option<&mut TextLabel> {
        self.text_labels.get_mut(id)
    }

    pub fn whiteboard(&self, id: &EntityId) -> Option<&Whiteboard> {
        self.whiteboards.get(id)
    }

    pub fn whiteboard_mut(&mut self, id: &EntityId) -> Option<&mut Whiteboard> {
        self.whiteboards.get_mut(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn arrows(&self) -> impl DoubleEndedIterator<Item = &Arrow> {
        self.arrows.iter()
    }

    pub fn text_labels(&self) -> impl DoubleEndedIterator<Item = &TextLabel> {
        self.text_labels.iter()
    }

    pub fn whiteboards(&self) -> impl DoubleEndedIterator<Item = &Whiteboard> {
        self.whiteboards.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn arrow_count(&self) -> usize {
        self.arrows.len()
    }

    pub fn text_label_count(&self) -> usize {
        self.text_labels.len()
    }

    pub fn whiteboard_count(&self) -> usize {
        self.whiteboards.len()
    }

    /// Which collection holds `id`, if any.
    pub fn kind_of(&self, id: &EntityId) -> Option<EntityKind> {
        if self.nodes.contains(id) {
            Some(EntityKind::Node)
        } else if self.arrows.contains(id) {
            Some(EntityKind::Arrow)
        } else if self.text_labels.contains(id) {
            Some(EntityKind::TextLabel)
        } else if self.whiteboards.contains(id) {
            Some(EntityKind::Whiteboard)
        } else {
            None
        }
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.kind_of(id).is_some()
    }

    /// Derived geometry of an arrow from its endpoints' current positions.
    pub fn arrow_geometry(&self, id: &EntityId) -> Option<ArrowGeometry> {
        let arrow = self.arrows.get(id)?;
        self.geometry_of(arrow)
    }

    fn geometry_of(&self, arrow: &Arrow) -> Option<ArrowGeometry> {
        let from = self.nodes.get(&arrow.from_node)?;
        let to = self.nodes.get(&arrow.to_node)?;
        Some(arrow.geometry(from, to))
    }

    /// Bounding box of all nodes and text labels.
    pub fn content_bounds(&self) -> Option<Rect> {
        self.nodes
            .iter()
            .map(|node| node.bounds())
            .chain(self.text_labels.iter().map(|label| label.bounds()))
            .reduce(|acc, bounds| acc.union(bounds))
    }

    /// Nodes and text labels whose position lies inside the whiteboard.
    pub fn entities_in_whiteboard(&self, id: &EntityId) -> Vec<ElementRef> {
        let Some(whiteboard) = self.whiteboards.get(id) else {
            return Vec::new();
        };
        let nodes = self
            .nodes
            .iter()
            .filter(|node| whiteboard.contains(node.position))
            .map(|node| ElementRef::new(EntityKind::Node, node.id.clone()));
        let labels = self
            .text_labels
            .iter()
            .filter(|label| whiteboard.contains(label.position))
            .map(|label| ElementRef::new(EntityKind::TextLabel, label.id.clone()));
        nodes.chain(labels).collect()
    }

    // --- Hit testing -------------------------------------------------------

    /// Find the entity under `point`: nodes first, then text labels, then
    /// arrows. Within a type the most recently added entity wins.
    pub fn find_element_at_point(&self, point: Point) -> Option<ElementRef> {
        self.find_element_at_point_within(point, ARROW_HIT_THRESHOLD)
    }

    /// [`find_element_at_point`](Self::find_element_at_point) with a custom
    /// arrow hit distance.
    pub fn find_element_at_point_within(
        &self,
        point: Point,
        arrow_threshold: f64,
    ) -> Option<ElementRef> {
        if let Some(node) = self.nodes.iter().rev().find(|node| node.hit_test(point)) {
            return Some(ElementRef::new(EntityKind::Node, node.id.clone()));
        }
        if let Some(label) = self
            .text_labels
            .iter()
            .rev()
            .find(|label| label.hit_test(point))
        {
            return Some(ElementRef::new(EntityKind::TextLabel, label.id.clone()));
        }
        self.arrows
            .iter()
            .rev()
            .find(|arrow| {
                self.geometry_of(arrow)
                    .is_some_and(|geometry| geometry.hit_test(point, arrow_threshold))
            })
            .map(|arrow| ElementRef::new(EntityKind::Arrow, arrow.id.clone()))
    }

    /// Topmost (last inserted) whiteboard containing `point`.
    pub fn find_whiteboard_at_point(&self, point: Point) -> Option<EntityId> {
        self.whiteboards
            .iter()
            .rev()
            .find(|whiteboard| whiteboard.contains(point))
            .map(|whiteboard| whiteboard.id.clone())
    }

    /// Entities touched by a selection box. Whiteboards are never included.
    pub fn find_elements_in_box(&self, selection_box: &SelectionBox) -> Vec<ElementRef> {
        self.find_elements_in_rect(selection_box.to_rect())
    }

    /// Nodes by circle/rect intersection, text labels by box overlap, arrows
    /// when the rect contains an endpoint or the midpoint.
    pub fn find_elements_in_rect(&self, rect: Rect) -> Vec<ElementRef> {
        let nodes = self
            .nodes
            .iter()
            .filter(|node| node.intersects_rect(rect))
            .map(|node| ElementRef::new(EntityKind::Node, node.id.clone()));
        let labels = self
            .text_labels
            .iter()
            .filter(|label| label.intersects_rect(rect))
            .map(|label| ElementRef::new(EntityKind::TextLabel, label.id.clone()));
        let arrows = self
            .arrows
            .iter()
            .filter(|arrow| {
                self.geometry_of(arrow)
                    .is_some_and(|geometry| geometry.intersects_rect(rect))
            })
            .map(|arrow| ElementRef::new(EntityKind::Arrow, arrow.id.clone()));
        nodes.chain(labels).chain(arrows).collect()
    }

    // --- Selection ---------------------------------------------------------

    fn set_selected_flag(&mut self, id: &EntityId, selected: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.selected = selected;
        } else if let Some(arrow) = self.arrows.get_mut(id) {
            arrow.selected = selected;
        } else if let Some(label) = self.text_labels.get_mut(id) {
            label.selected = selected;
        } else if let Some(whiteboard) = self.whiteboards.get_mut(id) {
            whiteboard.selected = selected;
        }
    }

    /// Select an entity, replacing the selection unless `additive`.
    ///
    /// Returns false for unknown ids.
    pub fn select_element(&mut self, id: &EntityId, additive: bool) -> bool {
        if !self.contains(id) {
            return false;
        }
        if !additive {
            self.clear_selection();
        }
        if !self.selection.contains(id) {
            self.selection.push(id.clone());
            self.set_selected_flag(id, true);
        }
        true
    }

    /// Select several entities at once. Unknown ids are skipped.
    pub fn select_elements<'a>(
        &mut self,
        ids: impl IntoIterator<Item = &'a EntityId>,
        additive: bool,
    ) {
        if !additive {
            self.clear_selection();
        }
        for id in ids {
            self.select_element(id, true);
        }
    }

    pub fn deselect_element(&mut self, id: &EntityId) -> bool {
        let before = self.selection.len();
        self.selection.retain(|selected| selected != id);
        let removed = self.selection.len() != before;
        if removed {
            self.set_selected_flag(id, false);
        }
        removed
    }

    pub fn clear_selection(&mut self) {
        for id in std::mem::take(&mut self.selection) {
            self.set_selected_flag(&id, false);
        }
    }

    /// Select every node, text label and arrow. Whiteboards are left out.
    pub fn select_all(&mut self) {
        self.clear_selection();
        let ids: Vec<EntityId> = self
            .nodes
            .ids()
            .chain(self.text_labels.ids())
            .chain(self.arrows.ids())
            .cloned()
            .collect();
        for id in &ids {
            self.select_element(id, true);
        }
    }

    /// Drop every whiteboard from the selection.
    pub fn deselect_whiteboards(&mut self) {
        let whiteboards: Vec<EntityId> = self
            .selection
            .iter()
            .filter(|id| self.whiteboards.contains(id))
            .cloned()
            .collect();
        for id in &whiteboards {
            self.deselect_element(id);
        }
    }

    pub fn is_selected(&self, id: &EntityId) -> bool {
        self.selection.contains(id)
    }

    /// Selected ids in selection order.
    pub fn selected_ids(&self) -> &[EntityId] {
        &self.selection
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// The first selected whiteboard, if any.
    pub fn selected_whiteboard(&self) -> Option<&EntityId> {
        self.selection
            .iter()
            .find(|id| self.whiteboards.contains(id))
    }

    // --- Bulk edits --------------------------------------------------------

    /// Delete every selected entity through the type-specific removal.
    ///
    /// Returns the number of entities removed directly (cascaded arrows are
    /// not counted). The last whiteboard survives and stays selected.
    pub fn delete_selected(&mut self) -> usize {
        let selected = self.selection.clone();
        selected.iter().filter(|id| self.remove(id)).count()
    }

    /// Duplicate the selection with the standard offset.
    pub fn duplicate_selected(&mut self) -> Vec<EntityId> {
        self.duplicate_selected_by(Vec2::new(DUPLICATE_OFFSET, DUPLICATE_OFFSET))
    }

    /// Clone selected nodes and text labels shifted by `offset`.
    ///
    /// A selected arrow is cloned only when both of its endpoints were
    /// duplicated too. The copies replace the selection.
    pub fn duplicate_selected_by(&mut self, offset: Vec2) -> Vec<EntityId> {
        let selected = self.selection.clone();
        let mut node_map: HashMap<EntityId, EntityId> = HashMap::new();
        let mut created = Vec::new();

        for id in &selected {
            match self.kind_of(id) {
                Some(EntityKind::Node) => {
                    let new_id = self.mint_id(EntityKind::Node);
                    if let Some(copy) = self
                        .nodes
                        .get(id)
                        .map(|node| node.duplicate(new_id.clone(), offset))
                    {
                        self.nodes.insert(new_id.clone(), copy);
                        node_map.insert(id.clone(), new_id.clone());
                        created.push(new_id);
                    }
                }
                Some(EntityKind::TextLabel) => {
                    let new_id = self.mint_id(EntityKind::TextLabel);
                    if let Some(copy) = self
                        .text_labels
                        .get(id)
                        .map(|label| label.duplicate(new_id.clone(), offset))
                    {
                        self.text_labels.insert(new_id.clone(), copy);
                        created.push(new_id);
                    }
                }
                _ => {}
            }
        }

        for id in &selected {
            let Some(arrow) = self.arrows.get(id) else {
                continue;
            };
            let (Some(from), Some(to)) = (
                node_map.get(&arrow.from_node).cloned(),
                node_map.get(&arrow.to_node).cloned(),
            ) else {
                debug!("Skipping arrow {} in duplicate: endpoint not duplicated", id);
                continue;
            };
            let new_id = self.mint_id(EntityKind::Arrow);
            if let Some(copy) = self
                .arrows
                .get(id)
                .map(|arrow| arrow.relinked(new_id.clone(), from, to))
            {
                self.arrows.insert(new_id.clone(), copy);
                created.push(new_id);
            }
        }

        self.select_elements(&created, false);
        created
    }

    /// Clone a whiteboard frame (not its contents) to its right.
    pub fn duplicate_whiteboard(&mut self, id: &EntityId) -> Option<EntityId> {
        let offset = Vec2::new(self.whiteboards.get(id)?.width + WHITEBOARD_GAP, 0.0);
        let new_id = self.mint_id(EntityKind::Whiteboard);
        let copy = self.whiteboards.get(id)?.duplicate(new_id.clone(), offset);
        self.whiteboards.insert(new_id.clone(), copy);
        self.select_element(&new_id, false);
        Some(new_id)
    }

    /// Serialize selected nodes, text labels and arrows for the clipboard.
    ///
    /// Arrows are included even when their endpoints are not; paste drops
    /// the orphans.
    pub fn copy_selected_to_clipboard(&self) -> String {
        let mut data = ClipboardData::default();
        for id in &self.selection {
            if let Some(node) = self.nodes.get(id) {
                data.nodes.push(node.clone());
            } else if let Some(label) = self.text_labels.get(id) {
                data.text_labels.push(label.clone());
            } else if let Some(arrow) = self.arrows.get(id) {
                data.arrows.push(arrow.clone());
            }
        }
        match serde_json::to_string(&data) {
            Ok(json) => json,
            Err(err) => {
                error!("Failed to serialize clipboard: {}", err);
                String::new()
            }
        }
    }

    /// Paste clipboard data with the standard offset.
    pub fn paste_from_clipboard(&mut self, data: &str) -> Vec<EntityId> {
        self.paste_from_clipboard_at(data, Vec2::new(DUPLICATE_OFFSET, DUPLICATE_OFFSET))
    }

    /// Insert clipboard entities under fresh ids, shifted by `offset`.
    ///
    /// Arrows are relinked to the pasted nodes; any arrow with an endpoint
    /// outside the pasted set is dropped. The pasted entities become the
    /// selection. Malformed data pastes nothing.
    pub fn paste_from_clipboard_at(&mut self, data: &str, offset: Vec2) -> Vec<EntityId> {
        let clipboard: ClipboardData = match serde_json::from_str(data) {
            Ok(clipboard) => clipboard,
            Err(err) => {
                warn!("Ignoring malformed clipboard data: {}", err);
                return Vec::new();
            }
        };
        if clipboard.is_empty() {
            return Vec::new();
        }

        let mut node_map: HashMap<EntityId, EntityId> = HashMap::new();
        let mut created = Vec::new();

        for node in &clipboard.nodes {
            let new_id = self.mint_id(EntityKind::Node);
            self.nodes
                .insert(new_id.clone(), node.duplicate(new_id.clone(), offset));
            node_map.insert(node.id.clone(), new_id.clone());
            created.push(new_id);
        }

        for label in &clipboard.text_labels {
            let new_id = self.mint_id(EntityKind::TextLabel);
            self.text_labels
                .insert(new_id.clone(), label.duplicate(new_id.clone(), offset));
            created.push(new_id);
        }

        for arrow in &clipboard.arrows {
            let (Some(from), Some(to)) = (node_map.get(&arrow.from_node), node_map.get(&arrow.to_node))
            else {
                warn!("Dropping pasted arrow {}: endpoint not in clipboard", arrow.id);
                continue;
            };
            let new_id = self.mint_id(EntityKind::Arrow);
            self.arrows.insert(
                new_id.clone(),
                arrow.relinked(new_id.clone(), from.clone(), to.clone()),
            );
            created.push(new_id);
        }

        self.select_elements(&created, false);
        created
    }

    // --- Entity mutation ---------------------------------------------------

    pub fn move_node(&mut self, id: &EntityId, position: Point) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    pub fn set_node_text(&mut self, id: &EntityId, text: impl Into<String>) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn set_node_style(&mut self, id: &EntityId, style: NodeStyle) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.style = style;
                true
            }
            None => false,
        }
    }

    pub fn move_text_label(&mut self, id: &EntityId, position: Point) -> bool {
        match self.text_labels.get_mut(id) {
            Some(label) => {
                label.position = position;
                true
            }
            None => false,
        }
    }

    pub fn set_text_label_text(&mut self, id: &EntityId, text: impl Into<String>) -> bool {
        match self.text_labels.get_mut(id) {
            Some(label) => {
                label.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Move a whiteboard frame by `delta`. Contents are not moved.
    pub fn move_whiteboard(&mut self, id: &EntityId, delta: Vec2) -> bool {
        match self.whiteboards.get_mut(id) {
            Some(whiteboard) => {
                whiteboard.translate(delta);
                true
            }
            None => false,
        }
    }

    /// Drag one resize handle of a whiteboard by `delta`.
    pub fn resize_whiteboard(&mut self, id: &EntityId, handle: ResizeHandle, delta: Vec2) -> bool {
        match self.whiteboards.get_mut(id) {
            Some(whiteboard) => {
                whiteboard.resize(handle, delta);
                true
            }
            None => false,
        }
    }

    /// Mark an entity as being dragged (nodes and text labels only).
    pub fn set_dragging(&mut self, id: &EntityId, dragging: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.dragging = dragging;
        } else if let Some(label) = self.text_labels.get_mut(id) {
            label.dragging = dragging;
        }
    }

    pub fn clear_dragging_flags(&mut self) {
        for node in self.nodes.values_mut() {
            node.dragging = false;
        }
        for label in self.text_labels.values_mut() {
            label.dragging = false;
        }
    }

    /// Move the selection by `delta` with drag semantics.
    ///
    /// Selected nodes and text labels move. A selected whiteboard moves along
    /// with every node and text label positioned inside it, selected or not.
    /// Each entity moves at most once. Arrows follow their nodes.
    pub fn move_selected(&mut self, delta: Vec2) {
        let mut targets: Vec<EntityId> = Vec::new();
        let mut seen: HashSet<EntityId> = HashSet::new();

        for id in &self.selection {
            if self.whiteboards.contains(id) {
                for contained in self.entities_in_whiteboard(id) {
                    if seen.insert(contained.id.clone()) {
                        targets.push(contained.id);
                    }
                }
            }
            if seen.insert(id.clone()) {
                targets.push(id.clone());
            }
        }

        for id in &targets {
            if let Some(node) = self.nodes.get_mut(id) {
                node.translate(delta);
            } else if let Some(label) = self.text_labels.get_mut(id) {
                label.translate(delta);
            } else if let Some(whiteboard) = self.whiteboards.get_mut(id) {
                whiteboard.translate(delta);
            }
        }
    }

    /// Apply a style patch to every selected entity. Fields that do not
    /// apply to an entity's type are ignored. Returns how many changed.
    pub fn apply_style_to_selected(&mut self, patch: &StylePatch) -> usize {
        let mut changed = 0;
        for id in &self.selection {
            if let Some(node) = self.nodes.get_mut(id) {
                patch.apply_to_node_style(&mut node.style);
                if let Some(font_family) = patch.font_family {
                    node.font_family = font_family;
                }
                changed += 1;
            } else if let Some(arrow) = self.arrows.get_mut(id) {
                if let Some(color) = patch.stroke_color {
                    arrow.stroke_color = color;
                }
                if let Some(width) = patch.stroke_width {
                    arrow.stroke_width = width;
                }
                if let Some(line_style) = patch.line_style {
                    arrow.line_style = line_style;
                }
                changed += 1;
            } else if let Some(label) = self.text_labels.get_mut(id) {
                if let Some(color) = patch.stroke_color {
                    label.color = color;
                }
                if let Some(font_family) = patch.font_family {
                    label.font_family = font_family;
                }
                if let Some(font_size) = patch.font_size {
                    label.font_size = font_size;
                }
                if let Some(show_border) = patch.show_border {
                    label.show_border = show_border;
                }
                if let Some(border_style) = patch.border_style {
                    label.border_style = border_style;
                }
                if let Some(border_color) = patch.border_color {
                    label.border_color = border_color;
                }
                if let Some(border_width) = patch.border_width {
                    label.border_width = border_width;
                }
                if let Some(padding) = patch.padding {
                    label.padding = padding.max(0.0);
                }
                changed += 1;
            } else if let Some(whiteboard) = self.whiteboards.get_mut(id) {
                if let Some(color) = patch.background_color {
                    whiteboard.background_color = color;
                    changed += 1;
                }
            }
        }
        changed
    }

    // --- Serialization -----------------------------------------------------

    /// Snapshot the scene as plain data, preserving ids and insertion order.
    pub fn to_data(&self) -> SceneData {
        SceneData {
            version: SCENE_VERSION,
            nodes: self.nodes.iter().cloned().collect(),
            arrows: self.arrows.iter().cloned().collect(),
            text_labels: self.text_labels.iter().cloned().collect(),
            whiteboards: self.whiteboards.iter().cloned().collect(),
        }
    }

    /// Serialize the whole scene. Selection is not persisted.
    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string(&self.to_data())?)
    }

    /// Rebuild a scene from plain data.
    ///
    /// Nodes go in before arrows; arrows with an unresolved endpoint are
    /// skipped with a warning. A document without whiteboards gets the
    /// default one. Id counters resume past the highest loaded id.
    pub fn from_data(data: SceneData) -> Self {
        let mut scene = Self {
            nodes: EntityMap::new(),
            arrows: EntityMap::new(),
            text_labels: EntityMap::new(),
            whiteboards: EntityMap::new(),
            selection: Vec::new(),
            ids: IdGenerator::new(),
        };

        for node in data.nodes {
            scene.add_node(node);
        }
        for label in data.text_labels {
            scene.add_text_label(label);
        }
        for whiteboard in data.whiteboards {
            scene.add_whiteboard(whiteboard);
        }
        for arrow in data.arrows {
            if scene.nodes.contains(&arrow.from_node) && scene.nodes.contains(&arrow.to_node) {
                scene.add_arrow(arrow);
            } else {
                warn!(
                    "Skipping arrow {}: endpoint {} or {} is missing",
                    arrow.id, arrow.from_node, arrow.to_node
                );
            }
        }
        if scene.whiteboards.is_empty() {
            scene.add_default_whiteboard();
        }
        scene
    }

    /// Parse a serialized scene.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let data: SceneData = serde_json::from_str(json)?;
        if data.version > SCENE_VERSION {
            return Err(SceneError::UnsupportedVersion {
                found: data.version,
                supported: SCENE_VERSION,
            });
        }
        Ok(Self::from_data(data))
    }

    /// Parse a serialized scene, falling back to a fresh scene when the data
    /// is malformed.
    pub fn from_json_or_default(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|err| {
            warn!("Failed to load scene, starting fresh: {}", err);
            Self::new()
        })
    }
}
