//! Interaction controller: turns pointer, keyboard and wheel input into scene
//! mutations.
//!
//! Two orthogonal pieces of state drive every decision: the active [`Tool`]
//! (picked by the user, occasionally switched by the controller itself) and
//! the [`InteractionMode`] of the gesture in progress. The controller never
//! calls back into the host; it queues [`ControllerEvent`]s that the host
//! drains after each call.

mod config;
mod keyboard;
mod pointer;

pub use config::{
    InteractionConfig, ARROW_DROP_MARGIN, ARROW_HIT_THRESHOLD_PX, BOX_SELECT_THRESHOLD,
    RESIZE_HANDLE_HALF_SIZE_PX, WHEEL_ZOOM_SENSITIVITY,
};

use crate::camera::ViewState;
use crate::entities::{EntityId, ResizeHandle};
use crate::laser::LaserTrail;
use crate::scene::Scene;
use crate::selection::SelectionBox;
use crate::tools::Tool;
use kurbo::{Point, Vec2};
use log::{debug, warn};

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// The gesture currently in progress. Each variant carries only the data
/// that gesture needs; pointer positions are world coordinates unless noted.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    /// Moving the selection. `last` is the previous pointer position.
    Dragging { last: Point },
    /// Dragging out an arrow from `source`.
    CreatingArrow { source: EntityId, pointer: Point },
    /// An external editor owns the text of `id`.
    EditingText { id: EntityId },
    /// Panning the view. Both values are screen space.
    Panning { start_screen: Point, start_pan: Vec2 },
    /// Rubber-band selection. `base` is the selection the box adds to.
    BoxSelecting {
        selection_box: SelectionBox,
        base: Vec<EntityId>,
    },
    /// Dragging one resize handle of a whiteboard.
    ResizingWhiteboard {
        whiteboard: EntityId,
        handle: ResizeHandle,
        last: Point,
    },
    /// Drawing the laser trail.
    LaserActive,
}

impl InteractionMode {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionMode::Idle)
    }

    pub fn is_editing_text(&self) -> bool {
        matches!(self, InteractionMode::EditingText { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            InteractionMode::Idle => "idle",
            InteractionMode::Dragging { .. } => "dragging",
            InteractionMode::CreatingArrow { .. } => "creating-arrow",
            InteractionMode::EditingText { .. } => "editing-text",
            InteractionMode::Panning { .. } => "panning",
            InteractionMode::BoxSelecting { .. } => "box-selecting",
            InteractionMode::ResizingWhiteboard { .. } => "resizing-whiteboard",
            InteractionMode::LaserActive => "laser",
        }
    }
}

/// Notifications for the host, drained with [`Controller::drain_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// Scene, view or transient state changed; repaint.
    Redraw,
    /// The active tool changed (also when the controller switched it).
    ToolChanged(Tool),
    /// Open a text editor for `id`, prefilled with `initial_text`. Answer
    /// with [`Controller::commit_text_edit`] or [`Controller::cancel_text_edit`].
    TextEditRequested { id: EntityId, initial_text: String },
    /// The text edit session ended; close the editor.
    TextEditEnded,
    /// Put this payload on the system clipboard.
    CopyToClipboard(String),
}

/// The interaction state machine.
///
/// Handlers take the scene by mutable reference; the controller owns only
/// transient state (tool, mode, view, laser trail).
#[derive(Debug, Clone, Default)]
pub struct Controller {
    tool: Tool,
    mode: InteractionMode,
    view: ViewState,
    laser: LaserTrail,
    config: InteractionConfig,
    events: Vec<ControllerEvent>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InteractionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Replace the view, e.g. after loading a persisted view state.
    pub fn set_view(&mut self, view: ViewState) {
        self.view = view;
        self.emit(ControllerEvent::Redraw);
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn laser(&self) -> &LaserTrail {
        &self.laser
    }

    /// The rubber band while box-selecting.
    pub fn selection_box(&self) -> Option<&SelectionBox> {
        match &self.mode {
            InteractionMode::BoxSelecting { selection_box, .. } => Some(selection_box),
            _ => None,
        }
    }

    /// Preview line while dragging out an arrow: from the source node's
    /// center to the pointer, in world coordinates.
    pub fn arrow_preview(&self, scene: &Scene) -> Option<(Point, Point)> {
        match &self.mode {
            InteractionMode::CreatingArrow { source, pointer } => {
                let node = scene.node(source)?;
                Some((node.position, *pointer))
            }
            _ => None,
        }
    }

    /// Take every queued event.
    pub fn drain_events(&mut self) -> Vec<ControllerEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: ControllerEvent) {
        if event == ControllerEvent::Redraw && self.events.last() == Some(&ControllerEvent::Redraw) {
            return;
        }
        self.events.push(event);
    }

    fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode != mode {
            debug!("Interaction mode: {} -> {}", self.mode.name(), mode.name());
        }
        self.mode = mode;
    }

    /// Switch tools. Any gesture other than a text edit is abandoned.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool == tool {
            return;
        }
        debug!("Tool: {} -> {}", self.tool, tool);
        self.tool = tool;
        if !self.mode.is_idle() && !self.mode.is_editing_text() {
            self.set_mode(InteractionMode::Idle);
        }
        self.emit(ControllerEvent::ToolChanged(tool));
        self.emit(ControllerEvent::Redraw);
    }

    /// Screen-space hit distance converted to world units.
    fn world_tolerance(&self, pixels: f64) -> f64 {
        pixels / self.view.zoom
    }

    // --- Text editing ------------------------------------------------------

    /// Open a text edit session on a node or text label.
    pub fn begin_text_edit(&mut self, scene: &mut Scene, id: &EntityId) -> bool {
        let initial_text = if let Some(node) = scene.node(id) {
            node.text.clone()
        } else if let Some(label) = scene.text_label(id) {
            label.text.clone()
        } else {
            return false;
        };
        scene.clear_dragging_flags();
        scene.select_element(id, false);
        self.set_mode(InteractionMode::EditingText { id: id.clone() });
        self.emit(ControllerEvent::TextEditRequested {
            id: id.clone(),
            initial_text,
        });
        self.emit(ControllerEvent::Redraw);
        true
    }

    /// Apply the edited text and end the session.
    ///
    /// A text label committed blank is deleted. A node committed blank keeps
    /// its previous caption. Commits for anything but the entity being edited
    /// are ignored and leave the session open.
    pub fn commit_text_edit(&mut self, scene: &mut Scene, id: &EntityId, text: &str) {
        match &self.mode {
            InteractionMode::EditingText { id: editing } if editing == id => {}
            _ => {
                warn!("Ignoring text commit for {} outside its edit session", id);
                return;
            }
        }

        let blank = text.trim().is_empty();
        if scene.node(id).is_some() {
            if !blank {
                scene.set_node_text(id, text);
            }
        } else if scene.text_label(id).is_some() {
            if blank {
                scene.remove_text_label(id);
            } else {
                scene.set_text_label_text(id, text);
            }
        }

        self.end_text_edit();
    }

    /// Abandon the edit session, leaving the text unchanged.
    pub fn cancel_text_edit(&mut self) {
        self.end_text_edit();
    }

    fn end_text_edit(&mut self) {
        if self.mode.is_editing_text() {
            self.set_mode(InteractionMode::Idle);
            self.emit(ControllerEvent::TextEditEnded);
        }
        self.emit(ControllerEvent::Redraw);
    }

    // --- Frame tick --------------------------------------------------------

    /// Per-frame tick: expire old laser points. Returns true while the trail
    /// still needs redrawing.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.laser.is_empty() {
            return false;
        }
        let active = self.laser.prune(now);
        self.emit(ControllerEvent::Redraw);
        active
    }

    // --- Clipboard ---------------------------------------------------------

    /// Paste clipboard text handed over by the host.
    pub fn paste(&mut self, scene: &mut Scene, data: &str) -> Vec<EntityId> {
        if self.mode.is_editing_text() {
            return Vec::new();
        }
        let offset = Vec2::new(self.config.paste_offset, self.config.paste_offset);
        let pasted = scene.paste_from_clipboard_at(data, offset);
        if !pasted.is_empty() {
            self.emit(ControllerEvent::Redraw);
        }
        pasted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let controller = Controller::new();
        assert_eq!(controller.tool(), Tool::Select);
        assert!(controller.mode().is_idle());
        assert!(controller.selection_box().is_none());
    }

    #[test]
    fn test_set_tool_emits_once() {
        let mut controller = Controller::new();
        controller.set_tool(Tool::Node);
        controller.set_tool(Tool::Node);
        let events = controller.drain_events();
        assert_eq!(
            events,
            vec![ControllerEvent::ToolChanged(Tool::Node), ControllerEvent::Redraw]
        );
        assert!(controller.drain_events().is_empty());
    }

    #[test]
    fn test_commit_blank_label_deletes_it() {
        let mut scene = Scene::new();
        let mut controller = Controller::new();
        let label = scene.create_text_label(Point::ZERO, "Text");
        assert!(controller.begin_text_edit(&mut scene, &label));
        assert!(controller.mode().is_editing_text());
        controller.commit_text_edit(&mut scene, &label, "   ");
        assert!(scene.text_label(&label).is_none());
        assert!(controller.mode().is_idle());
        assert!(controller.drain_events().contains(&ControllerEvent::TextEditEnded));
    }

    #[test]
    fn test_commit_blank_node_keeps_text() {
        let mut scene = Scene::new();
        let mut controller = Controller::new();
        let node = scene.create_node(Point::ZERO, "Keep");
        controller.begin_text_edit(&mut scene, &node);
        controller.commit_text_edit(&mut scene, &node, "");
        assert_eq!(scene.node(&node).unwrap().text, "Keep");

        controller.begin_text_edit(&mut scene, &node);
        controller.commit_text_edit(&mut scene, &node, "Renamed");
        assert_eq!(scene.node(&node).unwrap().text, "Renamed");
    }

    #[test]
    fn test_commit_for_other_entity_is_ignored() {
        let mut scene = Scene::new();
        let mut controller = Controller::new();
        let edited = scene.create_node(Point::ZERO, "Edited");
        let other = scene.create_node(Point::new(300.0, 0.0), "Other");
        controller.begin_text_edit(&mut scene, &edited);

        controller.commit_text_edit(&mut scene, &other, "Hijacked");
        assert_eq!(scene.node(&other).unwrap().text, "Other");
        assert_eq!(
            controller.mode(),
            &InteractionMode::EditingText { id: edited.clone() }
        );

        controller.commit_text_edit(&mut scene, &edited, "Done");
        assert_eq!(scene.node(&edited).unwrap().text, "Done");
        assert!(controller.mode().is_idle());
    }

    #[test]
    fn test_commit_without_session_changes_nothing() {
        let mut scene = Scene::new();
        let mut controller = Controller::new();
        let label = scene.create_text_label(Point::ZERO, "Text");
        controller.commit_text_edit(&mut scene, &label, "");
        assert!(scene.text_label(&label).is_some());
    }

    #[test]
    fn test_begin_text_edit_requests_editor() {
        let mut scene = Scene::new();
        let mut controller = Controller::new();
        let node = scene.create_node(Point::ZERO, "Hello");
        controller.begin_text_edit(&mut scene, &node);
        let events = controller.drain_events();
        assert!(events.contains(&ControllerEvent::TextEditRequested {
            id: node.clone(),
            initial_text: "Hello".to_string(),
        }));
        assert!(scene.is_selected(&node));
        assert!(!controller.begin_text_edit(&mut scene, &EntityId::new("node-99")));
    }

    #[test]
    fn test_cancel_text_edit() {
        let mut scene = Scene::new();
        let mut controller = Controller::new();
        let label = scene.create_text_label(Point::ZERO, "Text");
        controller.begin_text_edit(&mut scene, &label);
        controller.cancel_text_edit();
        assert!(controller.mode().is_idle());
        assert_eq!(scene.text_label(&label).unwrap().text, "Text");
    }

    #[test]
    fn test_tick_without_trail_is_quiet() {
        let mut controller = Controller::new();
        assert!(!controller.tick(Instant::now()));
        assert!(controller.drain_events().is_empty());
    }

    #[test]
    fn test_paste_uses_configured_offset() {
        let mut scene = Scene::new();
        let node = scene.create_node(Point::ZERO, "A");
        scene.select_element(&node, false);
        let clipboard = scene.copy_selected_to_clipboard();

        let config = InteractionConfig {
            paste_offset: 50.0,
            ..Default::default()
        };
        let mut controller = Controller::with_config(config);
        let pasted = controller.paste(&mut scene, &clipboard);
        assert_eq!(scene.node(&pasted[0]).unwrap().position, Point::new(50.0, 50.0));
    }
}
