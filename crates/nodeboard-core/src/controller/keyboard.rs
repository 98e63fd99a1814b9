//! Keyboard shortcuts, the Escape cascade and wheel input.

use super::{Controller, ControllerEvent, InteractionMode};
use crate::input::{Key, Modifiers, WheelEvent};
use crate::scene::Scene;
use crate::tools::Tool;
use kurbo::Vec2;
use log::debug;

impl Controller {
    /// Handle a key press.
    ///
    /// While a text edit is open only Escape is handled; everything else
    /// belongs to the external editor.
    pub fn key_down(&mut self, scene: &mut Scene, key: Key, modifiers: Modifiers) {
        if key == Key::Escape {
            self.escape(scene);
            return;
        }
        if self.mode.is_editing_text() {
            return;
        }

        match key {
            Key::Delete | Key::Backspace => {
                if scene.has_selection() {
                    let removed = scene.delete_selected();
                    debug!("Deleted {} selected entities", removed);
                    self.emit(ControllerEvent::Redraw);
                }
            }
            Key::Character(c) if modifiers.command() => self.command_shortcut(scene, c),
            Key::Character(c) if !modifiers.alt => {
                if let Some(tool) = Tool::from_shortcut(c) {
                    self.set_tool(tool);
                }
            }
            _ => {}
        }
    }

    fn command_shortcut(&mut self, scene: &mut Scene, key: char) {
        match key.to_ascii_lowercase() {
            'a' => {
                scene.select_all();
                self.emit(ControllerEvent::Redraw);
            }
            'd' => {
                let whiteboard = scene.selected_whiteboard().cloned();
                match whiteboard {
                    Some(id) if scene.selected_ids().len() == 1 => {
                        scene.duplicate_whiteboard(&id);
                    }
                    _ => {
                        let offset =
                            Vec2::new(self.config.duplicate_offset, self.config.duplicate_offset);
                        scene.duplicate_selected_by(offset);
                    }
                }
                self.emit(ControllerEvent::Redraw);
            }
            'c' => {
                self.copy_selection(scene);
            }
            'x' => {
                if self.copy_selection(scene) {
                    scene.delete_selected();
                    self.emit(ControllerEvent::Redraw);
                }
            }
            _ => {}
        }
    }

    /// Queue the selection for the system clipboard.
    fn copy_selection(&mut self, scene: &Scene) -> bool {
        if !scene.has_selection() {
            return false;
        }
        let payload = scene.copy_selected_to_clipboard();
        if payload.is_empty() {
            return false;
        }
        self.emit(ControllerEvent::CopyToClipboard(payload));
        true
    }

    /// Three-level Escape cascade: cancel the gesture in progress, else clear
    /// the selection, else return to the select tool. Three presses always
    /// reach (select tool, nothing selected, idle).
    pub fn escape(&mut self, scene: &mut Scene) {
        match std::mem::take(&mut self.mode) {
            InteractionMode::Idle => {}
            editing @ InteractionMode::EditingText { .. } => {
                self.mode = editing;
                self.cancel_text_edit();
                return;
            }
            InteractionMode::BoxSelecting { base, .. } => {
                debug!("Box selection cancelled");
                scene.select_elements(&base, false);
                self.emit(ControllerEvent::Redraw);
                return;
            }
            cancelled => {
                debug!("Cancelled {}", cancelled.name());
                scene.clear_dragging_flags();
                self.emit(ControllerEvent::Redraw);
                return;
            }
        }

        if scene.has_selection() {
            scene.clear_selection();
            self.emit(ControllerEvent::Redraw);
        } else if self.tool != Tool::Select {
            self.set_tool(Tool::Select);
        }
    }

    /// Handle wheel and trackpad input.
    ///
    /// With Ctrl/Cmd held the gesture zooms around the cursor; otherwise the
    /// delta pans the view, inverted to follow the fingers.
    pub fn wheel(&mut self, event: WheelEvent) {
        if event.is_zoom() {
            let factor = 1.0 - event.delta.y * self.config.wheel_zoom_sensitivity;
            self.view.zoom_at(event.position, self.view.zoom * factor);
        } else {
            self.view.pan_by(-event.delta);
        }
        self.emit(ControllerEvent::Redraw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{MAX_ZOOM, MIN_ZOOM};
    use crate::entities::EntityTrait;
    use crate::input::PointerEvent;
    use kurbo::Point;

    #[test]
    fn test_delete_key_removes_selection() {
        let mut scene = Scene::new();
        let a = scene.create_node(Point::ZERO, "A");
        let b = scene.create_node(Point::new(300.0, 0.0), "B");
        scene.create_arrow(&a, &b);
        scene.select_element(&a, false);
        let mut controller = Controller::new();
        controller.key_down(&mut scene, Key::Delete, Modifiers::NONE);
        assert!(scene.node(&a).is_none());
        assert_eq!(scene.arrow_count(), 0);
        assert!(scene.node(&b).is_some());
    }

    #[test]
    fn test_keys_ignored_while_editing_text() {
        let mut scene = Scene::new();
        let node = scene.create_node(Point::ZERO, "A");
        let mut controller = Controller::new();
        controller.begin_text_edit(&mut scene, &node);
        controller.key_down(&mut scene, Key::Backspace, Modifiers::NONE);
        controller.key_down(&mut scene, Key::Character('n'), Modifiers::NONE);
        assert!(scene.node(&node).is_some());
        assert_eq!(controller.tool(), Tool::Select);

        controller.key_down(&mut scene, Key::Escape, Modifiers::NONE);
        assert!(controller.mode().is_idle());
        assert!(controller.drain_events().contains(&ControllerEvent::TextEditEnded));
    }

    #[test]
    fn test_tool_letters() {
        let mut scene = Scene::new();
        let mut controller = Controller::new();
        controller.key_down(&mut scene, Key::Character('l'), Modifiers::NONE);
        assert_eq!(controller.tool(), Tool::Laser);
        controller.key_down(&mut scene, Key::Character('v'), Modifiers::NONE);
        assert_eq!(controller.tool(), Tool::Select);
    }

    #[test]
    fn test_escape_cascade_levels() {
        let mut scene = Scene::new();
        let node = scene.create_node(Point::ZERO, "A");
        scene.select_element(&node, false);
        let mut controller = Controller::new();
        controller.set_tool(Tool::Arrow);
        controller.pointer_down(&mut scene, PointerEvent::at(0.0, 0.0));
        assert!(matches!(controller.mode(), InteractionMode::CreatingArrow { .. }));

        controller.escape(&mut scene);
        assert!(controller.mode().is_idle());
        assert!(scene.has_selection());
        assert_eq!(controller.tool(), Tool::Arrow);

        controller.escape(&mut scene);
        assert!(!scene.has_selection());
        assert_eq!(controller.tool(), Tool::Arrow);

        controller.escape(&mut scene);
        assert_eq!(controller.tool(), Tool::Select);
    }

    #[test]
    fn test_escape_cancels_box_select() {
        let mut scene = Scene::new();
        let node = scene.create_node(Point::new(2000.0, 2000.0), "A");
        let mut controller = Controller::new();
        controller.pointer_down(&mut scene, PointerEvent::at(1900.0, 1900.0));
        controller.pointer_move(&mut scene, PointerEvent::at(2100.0, 2100.0));
        assert!(scene.is_selected(&node));
        controller.escape(&mut scene);
        assert!(controller.mode().is_idle());
        assert!(!scene.is_selected(&node));
    }

    #[test]
    fn test_select_all_and_duplicate_shortcuts() {
        let mut scene = Scene::new();
        scene.create_node(Point::ZERO, "A");
        scene.create_text_label(Point::new(500.0, 0.0), "T");
        let mut controller = Controller::new();
        controller.key_down(&mut scene, Key::Character('a'), Modifiers::ctrl());
        assert_eq!(scene.selected_ids().len(), 2);
        controller.key_down(&mut scene, Key::Character('d'), Modifiers::meta());
        assert_eq!(scene.node_count(), 2);
        assert_eq!(scene.text_label_count(), 2);
    }

    #[test]
    fn test_duplicate_shortcut_on_whiteboard() {
        let mut scene = Scene::new();
        let whiteboard = scene.whiteboards().next().unwrap().id().clone();
        scene.select_element(&whiteboard, false);
        let mut controller = Controller::new();
        controller.key_down(&mut scene, Key::Character('d'), Modifiers::ctrl());
        assert_eq!(scene.whiteboard_count(), 2);
    }

    #[test]
    fn test_copy_and_cut_emit_clipboard() {
        let mut scene = Scene::new();
        let node = scene.create_node(Point::ZERO, "A");
        scene.select_element(&node, false);
        let mut controller = Controller::new();

        controller.key_down(&mut scene, Key::Character('c'), Modifiers::ctrl());
        let copied = controller.drain_events().into_iter().find_map(|event| match event {
            ControllerEvent::CopyToClipboard(payload) => Some(payload),
            _ => None,
        });
        let payload = copied.unwrap();
        assert!(payload.contains("\"nodes\""));
        assert!(scene.node(&node).is_some());

        controller.key_down(&mut scene, Key::Character('x'), Modifiers::ctrl());
        assert!(scene.node(&node).is_none());

        let pasted = controller.paste(&mut scene, &payload);
        assert_eq!(pasted.len(), 1);
    }

    #[test]
    fn test_wheel_pans_inverted() {
        let mut controller = Controller::new();
        controller.wheel(WheelEvent::new(Point::ZERO, Vec2::new(10.0, -20.0)));
        assert_eq!(controller.view().pan, Vec2::new(-10.0, 20.0));
    }

    #[test]
    fn test_wheel_zoom_keeps_cursor_fixed() {
        let mut controller = Controller::new();
        let cursor = Point::new(300.0, 200.0);
        let before = controller.view().screen_to_world(cursor);
        controller
            .wheel(WheelEvent::new(cursor, Vec2::new(0.0, -50.0)).with_modifiers(Modifiers::ctrl()));
        assert!((controller.view().zoom - 1.5).abs() < 1e-10);
        let after = controller.view().screen_to_world(cursor);
        assert!((before.x - after.x).abs() < 1e-10);
        assert!((before.y - after.y).abs() < 1e-10);
    }

    #[test]
    fn test_wheel_zoom_clamped() {
        let mut controller = Controller::new();
        let zoom_in = WheelEvent::new(Point::ZERO, Vec2::new(0.0, -90.0))
            .with_modifiers(Modifiers::ctrl());
        for _ in 0..20 {
            controller.wheel(zoom_in);
        }
        assert!((controller.view().zoom - MAX_ZOOM).abs() < f64::EPSILON);

        let zoom_out = WheelEvent::new(Point::ZERO, Vec2::new(0.0, 90.0))
            .with_modifiers(Modifiers::ctrl());
        for _ in 0..40 {
            controller.wheel(zoom_out);
        }
        assert!((controller.view().zoom - MIN_ZOOM).abs() < f64::EPSILON);
    }
}
