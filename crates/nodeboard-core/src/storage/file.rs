//! File-based storage implementation for native platforms.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::camera::ViewState;
use crate::scene::Scene;
use std::fs;
use std::path::{Path, PathBuf};

const SCENE_EXTENSION: &str = "json";
const VIEW_SUFFIX: &str = ".view";

/// File-based storage for native platforms.
///
/// Each board is two JSON files in one directory: `<id>.json` holds the
/// scene and `<id>.view.json` holds the view state.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Unix: `~/.local/share/nodeboard/boards/`
    /// On Windows: `%LOCALAPPDATA%\nodeboard\boards\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("nodeboard").join("boards"))
    }

    fn safe_id(id: &str) -> String {
        id.chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect()
    }

    fn scene_path(&self, id: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.{}", Self::safe_id(id), SCENE_EXTENSION))
    }

    fn view_path(&self, id: &str) -> PathBuf {
        self.base_path
            .join(format!("{}{}.{}", Self::safe_id(id), VIEW_SUFFIX, SCENE_EXTENSION))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

fn write_file(path: PathBuf, contents: String) -> StorageResult<()> {
    fs::write(&path, contents)
        .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
}

fn read_file(path: &Path, id: &str) -> StorageResult<String> {
    if !path.exists() {
        return Err(StorageError::NotFound(id.to_string()));
    }
    fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))
}

impl Storage for FileStorage {
    fn save_scene(&self, id: &str, scene: &Scene) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.scene_path(id);
        let json = scene.to_json();
        Box::pin(async move {
            let json = json.map_err(|e| StorageError::Serialization(e.to_string()))?;
            write_file(path, json)
        })
    }

    fn load_scene(&self, id: &str) -> BoxFuture<'_, StorageResult<Scene>> {
        let path = self.scene_path(id);
        let id = id.to_string();
        Box::pin(async move {
            let json = read_file(&path, &id)?;
            Scene::from_json(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }

    fn save_view_state(&self, id: &str, view: &ViewState) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.view_path(id);
        let json = view.to_json();
        Box::pin(async move {
            let json = json.map_err(|e| StorageError::Serialization(e.to_string()))?;
            write_file(path, json)
        })
    }

    fn load_view_state(&self, id: &str) -> BoxFuture<'_, StorageResult<ViewState>> {
        let path = self.view_path(id);
        let id = id.to_string();
        Box::pin(async move {
            let json = read_file(&path, &id)?;
            ViewState::from_json(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let paths = [self.scene_path(id), self.view_path(id)];
        Box::pin(async move {
            for path in paths.iter().filter(|path| path.exists()) {
                fs::remove_file(path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }

            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

            let mut ids = Vec::new();
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_none_or(|ext| ext != SCENE_EXTENSION) {
                    continue;
                }
                // View files share the extension
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if !stem.ends_with(VIEW_SUFFIX) {
                        ids.push(stem.to_string());
                    }
                }
            }
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.scene_path(id);
        Box::pin(async move { Ok(path.exists()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Vec2};
    use pollster::block_on;
    use tempfile::tempdir;

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        let a = scene.create_node(Point::new(0.0, 0.0), "A");
        let b = scene.create_node(Point::new(200.0, 0.0), "B");
        scene.create_arrow(&a, &b);
        scene
    }

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let scene = sample_scene();

        block_on(storage.save_scene("test-board", &scene)).unwrap();
        let loaded = block_on(storage.load_scene("test-board")).unwrap();

        assert_eq!(loaded.to_data(), scene.to_data());
        assert!(dir.path().join("test-board.json").exists());
    }

    #[test]
    fn test_file_storage_view_state() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let view = ViewState {
            zoom: 1.5,
            pan: Vec2::new(-40.0, 12.0),
        };

        block_on(storage.save_view_state("board", &view)).unwrap();
        let loaded = block_on(storage.load_view_state("board")).unwrap();

        assert_eq!(loaded, view);
        assert!(dir.path().join("board.view.json").exists());
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let result = block_on(storage.load_scene("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_storage_corrupt_scene() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let result = block_on(storage.load_scene("broken"));
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_file_storage_list_skips_view_files() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let scene = sample_scene();

        block_on(storage.save_scene("board1", &scene)).unwrap();
        block_on(storage.save_scene("board2", &scene)).unwrap();
        block_on(storage.save_view_state("board1", &ViewState::default())).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let list = block_on(storage.list()).unwrap();
        assert_eq!(list, vec!["board1".to_string(), "board2".to_string()]);
    }

    #[test]
    fn test_file_storage_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let scene = sample_scene();

        block_on(storage.save_scene("test", &scene)).unwrap();
        block_on(storage.save_view_state("test", &ViewState::default())).unwrap();
        assert!(block_on(storage.exists("test")).unwrap());

        block_on(storage.delete("test")).unwrap();
        assert!(!block_on(storage.exists("test")).unwrap());
        assert!(!dir.path().join("test.view.json").exists());
    }

    #[test]
    fn test_file_storage_sanitizes_id() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let scene = sample_scene();

        block_on(storage.save_scene("test/board:with*special", &scene)).unwrap();

        let loaded = block_on(storage.load_scene("test/board:with*special")).unwrap();
        assert_eq!(loaded.node_count(), 2);
    }
}
