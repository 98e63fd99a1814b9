//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::camera::ViewState;
use crate::scene::{Scene, SceneData};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
///
/// Scenes are kept as plain data, so a load goes through the same rebuild
/// path as a file load.
#[derive(Default)]
pub struct MemoryStorage {
    scenes: RwLock<HashMap<String, SceneData>>,
    views: RwLock<HashMap<String, ViewState>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save_scene(&self, id: &str, scene: &Scene) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let data = scene.to_data();
        Box::pin(async move {
            let mut scenes = self.scenes.write().map_err(lock_error)?;
            scenes.insert(id, data);
            Ok(())
        })
    }

    fn load_scene(&self, id: &str) -> BoxFuture<'_, StorageResult<Scene>> {
        let id = id.to_string();
        Box::pin(async move {
            let scenes = self.scenes.read().map_err(lock_error)?;
            scenes
                .get(&id)
                .cloned()
                .map(Scene::from_data)
                .ok_or(StorageError::NotFound(id))
        })
    }

    fn save_view_state(&self, id: &str, view: &ViewState) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let view = *view;
        Box::pin(async move {
            let mut views = self.views.write().map_err(lock_error)?;
            views.insert(id, view);
            Ok(())
        })
    }

    fn load_view_state(&self, id: &str) -> BoxFuture<'_, StorageResult<ViewState>> {
        let id = id.to_string();
        Box::pin(async move {
            let views = self.views.read().map_err(lock_error)?;
            views.get(&id).copied().ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            self.scenes.write().map_err(lock_error)?.remove(&id);
            self.views.write().map_err(lock_error)?.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let scenes = self.scenes.read().map_err(lock_error)?;
            Ok(scenes.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let scenes = self.scenes.read().map_err(lock_error)?;
            Ok(scenes.contains_key(&id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use pollster::block_on;

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        let a = scene.create_node(Point::new(0.0, 0.0), "A");
        let b = scene.create_node(Point::new(200.0, 0.0), "B");
        scene.create_arrow(&a, &b);
        scene
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let scene = sample_scene();

        block_on(storage.save_scene("test", &scene)).unwrap();
        let loaded = block_on(storage.load_scene("test")).unwrap();

        assert_eq!(loaded.to_data(), scene.to_data());
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load_scene("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));

        let result = block_on(storage.load_view_state("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_exists_and_delete() {
        let storage = MemoryStorage::new();
        let scene = sample_scene();

        assert!(!block_on(storage.exists("test")).unwrap());
        block_on(storage.save_scene("test", &scene)).unwrap();
        block_on(storage.save_view_state("test", &ViewState::default())).unwrap();
        assert!(block_on(storage.exists("test")).unwrap());

        block_on(storage.delete("test")).unwrap();
        assert!(!block_on(storage.exists("test")).unwrap());
        assert!(block_on(storage.load_view_state("test")).is_err());
    }

    #[test]
    fn test_list() {
        let storage = MemoryStorage::new();
        let scene = sample_scene();

        block_on(storage.save_scene("board1", &scene)).unwrap();
        block_on(storage.save_scene("board2", &scene)).unwrap();

        let list = block_on(storage.list()).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains(&"board1".to_string()));
        assert!(list.contains(&"board2".to_string()));
    }
}
