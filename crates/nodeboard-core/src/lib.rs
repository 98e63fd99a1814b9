//! Nodeboard Core Library
//!
//! Platform-agnostic scene model, hit testing and interaction state machine
//! for the Nodeboard diagram editor. Rendering and text input live in the
//! host; this crate only owns the data and the rules for changing it.

pub mod camera;
pub mod controller;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod input;
pub mod laser;
pub mod scene;
pub mod selection;
pub mod storage;
pub mod style;
pub mod tools;

pub use camera::{ViewState, MAX_ZOOM, MIN_ZOOM};
pub use controller::{Controller, ControllerEvent, InteractionConfig, InteractionMode};
pub use entities::{
    Arrow, ArrowGeometry, Corner, Edge, EntityId, EntityKind, EntityTrait, IdGenerator, Node,
    ResizeHandle, TextLabel, Whiteboard,
};
pub use error::{SceneError, StyleError};
pub use input::{Key, Modifiers, PointerEvent, WheelEvent};
pub use laser::LaserTrail;
pub use scene::{ClipboardData, ElementRef, Scene, SceneData};
pub use selection::SelectionBox;
pub use storage::{MemoryStorage, Storage, StorageError, StorageResult};
pub use style::{NodeStyle, PaletteColor, StylePatch};
pub use tools::Tool;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
