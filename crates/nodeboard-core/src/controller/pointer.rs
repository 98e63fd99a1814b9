//! Pointer down/move/up and double-click handling.

use super::{Controller, ControllerEvent, InteractionMode};
use crate::entities::{EntityId, EntityKind, EntityTrait};
use crate::input::PointerEvent;
use crate::scene::Scene;
use crate::selection::SelectionBox;
use crate::tools::Tool;
use kurbo::Point;
use log::debug;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

impl Controller {
    /// Handle a pointer press.
    pub fn pointer_down(&mut self, scene: &mut Scene, event: PointerEvent) {
        // The external editor owns the pointer while text is being edited.
        if self.mode.is_editing_text() {
            return;
        }
        let world = self.view.screen_to_world(event.position);

        match self.tool {
            Tool::Select => self.select_press(scene, world, event.is_additive()),
            Tool::Node => {
                let id = scene.create_node(world, self.config.new_node_text.clone());
                scene.select_element(&id, false);
                debug!("Created node {} at ({:.1}, {:.1})", id, world.x, world.y);
                self.set_tool(Tool::Arrow);
            }
            Tool::Arrow => {
                let hit = scene.find_element_at_point_within(
                    world,
                    self.world_tolerance(self.config.arrow_hit_threshold),
                );
                if let Some(hit) = hit.filter(|hit| hit.kind == EntityKind::Node) {
                    self.set_mode(InteractionMode::CreatingArrow {
                        source: hit.id,
                        pointer: world,
                    });
                }
            }
            Tool::Text => {
                let id = scene.create_text_label(world, self.config.new_text_label_text.clone());
                scene.select_element(&id, false);
                debug!("Created text label {}", id);
                self.set_tool(Tool::Select);
            }
            Tool::Pan => {
                self.set_mode(InteractionMode::Panning {
                    start_screen: event.position,
                    start_pan: self.view.pan,
                });
            }
            Tool::Laser => {
                self.laser.clear();
                self.laser.push(world, Instant::now());
                self.set_mode(InteractionMode::LaserActive);
            }
        }
        self.emit(ControllerEvent::Redraw);
    }

    /// Select tool press: resize handle, then entity, then whiteboard, then
    /// empty space.
    fn select_press(&mut self, scene: &mut Scene, world: Point, additive: bool) {
        let handle_size = self.world_tolerance(self.config.resize_handle_half_size);
        let handle_hit = scene.selected_whiteboard().and_then(|id| {
            let whiteboard = scene.whiteboard(id)?;
            let handle = whiteboard.hit_test_handle(world, handle_size)?;
            Some((id.clone(), handle))
        });
        if let Some((whiteboard, handle)) = handle_hit {
            self.set_mode(InteractionMode::ResizingWhiteboard {
                whiteboard,
                handle,
                last: world,
            });
            return;
        }

        let hit = scene.find_element_at_point_within(
            world,
            self.world_tolerance(self.config.arrow_hit_threshold),
        );
        if let Some(hit) = hit {
            scene.deselect_whiteboards();
            if additive {
                if scene.is_selected(&hit.id) {
                    scene.deselect_element(&hit.id);
                } else {
                    scene.select_element(&hit.id, true);
                }
            } else if !scene.is_selected(&hit.id) {
                scene.select_element(&hit.id, false);
            }
            if matches!(hit.kind, EntityKind::Node | EntityKind::TextLabel) {
                scene.set_dragging(&hit.id, true);
                self.set_mode(InteractionMode::Dragging { last: world });
            }
            return;
        }

        if let Some(whiteboard) = scene.find_whiteboard_at_point(world) {
            scene.select_element(&whiteboard, false);
            self.set_mode(InteractionMode::Dragging { last: world });
            return;
        }

        scene.deselect_whiteboards();
        if !additive {
            scene.clear_selection();
        }
        let base = scene.selected_ids().to_vec();
        self.set_mode(InteractionMode::BoxSelecting {
            selection_box: SelectionBox::new(world),
            base,
        });
    }

    /// Handle pointer motion.
    pub fn pointer_move(&mut self, scene: &mut Scene, event: PointerEvent) {
        let world = self.view.screen_to_world(event.position);

        let changed = match &mut self.mode {
            InteractionMode::Idle | InteractionMode::EditingText { .. } => false,
            InteractionMode::Dragging { last } => {
                let delta = world - *last;
                *last = world;
                scene.move_selected(delta);
                true
            }
            InteractionMode::CreatingArrow { pointer, .. } => {
                *pointer = world;
                true
            }
            InteractionMode::Panning {
                start_screen,
                start_pan,
            } => {
                // Screen-space delta so pan speed does not depend on zoom.
                self.view.pan = *start_pan + (event.position - *start_screen);
                true
            }
            InteractionMode::BoxSelecting {
                selection_box,
                base,
            } => {
                selection_box.update(world);
                let hits: Vec<EntityId> = scene
                    .find_elements_in_box(selection_box)
                    .into_iter()
                    .map(|hit| hit.id)
                    .collect();
                scene.select_elements(base.iter(), false);
                scene.select_elements(&hits, true);
                true
            }
            InteractionMode::ResizingWhiteboard {
                whiteboard,
                handle,
                last,
            } => {
                let delta = world - *last;
                *last = world;
                scene.resize_whiteboard(whiteboard, *handle, delta)
            }
            InteractionMode::LaserActive => {
                let now = Instant::now();
                self.laser.push(world, now);
                self.laser.prune(now);
                true
            }
        };

        if changed {
            self.emit(ControllerEvent::Redraw);
        }
    }

    /// Handle a pointer release.
    pub fn pointer_up(&mut self, scene: &mut Scene, event: PointerEvent) {
        let world = self.view.screen_to_world(event.position);
        let mode = std::mem::take(&mut self.mode);

        match mode {
            InteractionMode::CreatingArrow { source, .. } => {
                self.finish_arrow(scene, &source, world);
            }
            InteractionMode::BoxSelecting {
                mut selection_box,
                base,
            } => {
                selection_box.update(world);
                scene.select_elements(&base, false);
                let threshold = self.world_tolerance(self.config.box_select_threshold);
                if selection_box.is_significant(threshold) {
                    let hits: Vec<EntityId> = scene
                        .find_elements_in_box(&selection_box)
                        .into_iter()
                        .map(|hit| hit.id)
                        .collect();
                    scene.select_elements(&hits, true);
                }
            }
            // The trail is left to fade on its own.
            InteractionMode::LaserActive => {}
            editing @ InteractionMode::EditingText { .. } => {
                self.mode = editing;
            }
            _ => {}
        }

        scene.clear_dragging_flags();
        if !self.mode.is_editing_text() {
            self.set_mode(InteractionMode::Idle);
        }
        self.emit(ControllerEvent::Redraw);
    }

    /// Complete an arrow drag released at `world`.
    ///
    /// Released on another node: connect the two. Released on empty space
    /// far enough from the source: create a node there and connect to it,
    /// keeping the arrow tool. Anything else is an aborted gesture.
    fn finish_arrow(&mut self, scene: &mut Scene, source: &EntityId, world: Point) {
        let Some(source_node) = scene.node(source) else {
            return;
        };
        let drop_distance = source_node.radius + self.config.arrow_drop_margin;
        let far_enough = world.distance(source_node.position) > drop_distance;

        // Only nodes can be arrow targets, even under an overlapping label.
        let target = scene
            .nodes()
            .rev()
            .find(|node| node.hit_test(world))
            .map(|node| node.id().clone());

        match target {
            Some(target) if &target != source => {
                scene.create_arrow(source, &target);
            }
            Some(_) => {}
            None if far_enough => {
                let node = scene.create_node(world, self.config.new_node_text.clone());
                scene.select_element(&node, false);
                scene.create_arrow(source, &node);
            }
            None => debug!("Arrow drag too short, nothing created"),
        }
    }

    /// Handle a double click.
    ///
    /// On a node or text label this opens a text edit session. On empty space
    /// with the arrow tool it returns to the select tool.
    pub fn double_click(&mut self, scene: &mut Scene, event: PointerEvent) {
        if self.mode.is_editing_text() {
            return;
        }
        let world = self.view.screen_to_world(event.position);
        let hit = scene.find_element_at_point_within(
            world,
            self.world_tolerance(self.config.arrow_hit_threshold),
        );

        match hit {
            Some(hit) if matches!(hit.kind, EntityKind::Node | EntityKind::TextLabel) => {
                self.set_mode(InteractionMode::Idle);
                self.begin_text_edit(scene, &hit.id);
            }
            None if self.tool == Tool::Arrow => self.set_tool(Tool::Select),
            _ => {}
        }
    }
}
