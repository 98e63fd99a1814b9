//! Storage abstraction for persisting boards.
//!
//! A board is a scene plus its view state, stored separately under the same
//! id so the view can be saved on every pan without rewriting the scene.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::camera::ViewState;
use crate::scene::Scene;
use log::{debug, warn};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Board not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for board storage backends.
///
/// On native platforms implementations must be Send + Sync. On WASM these
/// bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Save a scene.
    fn save_scene(&self, id: &str, scene: &Scene) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a scene.
    fn load_scene(&self, id: &str) -> BoxFuture<'_, StorageResult<Scene>>;

    /// Save the view state of a board.
    fn save_view_state(&self, id: &str, view: &ViewState) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the view state of a board.
    fn load_view_state(&self, id: &str) -> BoxFuture<'_, StorageResult<ViewState>>;

    /// Delete a board's scene and view state.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all board IDs.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a board's scene exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Trait for board storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    /// Save a scene.
    fn save_scene(&self, id: &str, scene: &Scene) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a scene.
    fn load_scene(&self, id: &str) -> BoxFuture<'_, StorageResult<Scene>>;

    /// Save the view state of a board.
    fn save_view_state(&self, id: &str, view: &ViewState) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the view state of a board.
    fn load_view_state(&self, id: &str) -> BoxFuture<'_, StorageResult<ViewState>>;

    /// Delete a board's scene and view state.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all board IDs.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a board's scene exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Load a board's scene, falling back to a fresh scene when it is missing or
/// unreadable.
pub async fn load_scene_or_default<S: Storage + ?Sized>(storage: &S, id: &str) -> Scene {
    match storage.load_scene(id).await {
        Ok(scene) => scene,
        Err(StorageError::NotFound(_)) => {
            debug!("No saved scene for {}, starting fresh", id);
            Scene::new()
        }
        Err(err) => {
            warn!("Failed to load scene {}: {}", id, err);
            Scene::new()
        }
    }
}

/// Load a board's view state, falling back to the default view.
pub async fn load_view_state_or_default<S: Storage + ?Sized>(storage: &S, id: &str) -> ViewState {
    match storage.load_view_state(id).await {
        Ok(view) => view,
        Err(StorageError::NotFound(_)) => ViewState::default(),
        Err(err) => {
            warn!("Failed to load view state {}: {}", id, err);
            ViewState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Vec2};

    #[test]
    fn test_load_or_default_missing() {
        let storage = MemoryStorage::new();
        let scene = pollster::block_on(load_scene_or_default(&storage, "missing"));
        assert_eq!(scene.whiteboard_count(), 1);
        assert_eq!(scene.node_count(), 0);
        let view = pollster::block_on(load_view_state_or_default(&storage, "missing"));
        assert_eq!(view, ViewState::default());
    }

    #[test]
    fn test_load_or_default_existing() {
        let storage = MemoryStorage::new();
        let mut scene = Scene::new();
        scene.create_node(Point::new(1.0, 2.0), "saved");
        let view = ViewState {
            zoom: 2.0,
            pan: Vec2::new(5.0, 5.0),
        };
        pollster::block_on(storage.save_scene("board", &scene)).unwrap();
        pollster::block_on(storage.save_view_state("board", &view)).unwrap();

        let loaded = pollster::block_on(load_scene_or_default(&storage, "board"));
        assert_eq!(loaded.node_count(), 1);
        let loaded_view = pollster::block_on(load_view_state_or_default(&storage, "board"));
        assert_eq!(loaded_view, view);
    }
}
