//! Input events handed to the controller by the host.
//!
//! The host translates its native events (DOM, winit, ...) into these types.
//! Pointer positions are in screen coordinates.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::NONE
        }
    }

    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Delete,
    Backspace,
    /// A printable character key.
    Character(char),
}

/// A pointer down/move/up event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Position in screen coordinates.
    pub position: Point,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn at(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y))
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Shift-click extends the selection.
    pub fn is_additive(&self) -> bool {
        self.modifiers.shift
    }
}

/// A wheel or two-finger trackpad gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    /// Cursor position in screen coordinates.
    pub position: Point,
    /// Scroll delta as reported by the platform.
    pub delta: Vec2,
    pub modifiers: Modifiers,
}

impl WheelEvent {
    pub fn new(position: Point, delta: Vec2) -> Self {
        Self {
            position,
            delta,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Ctrl/Cmd-held wheel (and trackpad pinch, which browsers report the
    /// same way) zooms instead of panning.
    pub fn is_zoom(&self) -> bool {
        self.modifiers.command()
    }
}
