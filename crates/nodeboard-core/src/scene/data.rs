//! Plain-data forms of a scene used for persistence, share links and the
//! clipboard.

use crate::entities::{Arrow, Node, TextLabel, Whiteboard};
use serde::{Deserialize, Serialize};

/// Newest scene document version this crate reads and writes.
pub const SCENE_VERSION: u32 = 1;

fn default_version() -> u32 {
    SCENE_VERSION
}

/// Serialized scene document.
///
/// Arrows reference nodes by id. On load nodes are inserted first and any
/// arrow whose endpoints do not resolve is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneData {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub arrows: Vec<Arrow>,
    #[serde(default)]
    pub text_labels: Vec<TextLabel>,
    #[serde(default)]
    pub whiteboards: Vec<Whiteboard>,
}

impl Default for SceneData {
    fn default() -> Self {
        Self {
            version: SCENE_VERSION,
            nodes: Vec::new(),
            arrows: Vec::new(),
            text_labels: Vec::new(),
            whiteboards: Vec::new(),
        }
    }
}

/// Clipboard transport: the scene format without whiteboards.
///
/// Arrows are copied even when an endpoint was not; paste drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardData {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub arrows: Vec<Arrow>,
    #[serde(default)]
    pub text_labels: Vec<TextLabel>,
}

impl ClipboardData {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.arrows.is_empty() && self.text_labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_default_to_empty() {
        let data: SceneData = serde_json::from_str(r#"{"nodes": []}"#).unwrap();
        assert_eq!(data.version, SCENE_VERSION);
        assert!(data.arrows.is_empty());
        assert!(data.whiteboards.is_empty());
    }

    #[test]
    fn test_reads_minimal_entities() {
        let json = r#"{
            "nodes": [{"id": "node-0", "position": {"x": 1, "y": 2}, "text": "A"}],
            "textLabels": [{"id": "text-0", "position": {"x": 0, "y": 0}, "text": "T"}],
            "whiteboards": [{"id": "whiteboard-0", "position": {"x": 0, "y": 0}, "width": 800, "height": 600}]
        }"#;
        let data: SceneData = serde_json::from_str(json).unwrap();
        assert_eq!(data.nodes[0].radius, 60.0);
        assert_eq!(data.text_labels[0].padding, 8.0);
        assert_eq!(data.whiteboards[0].background_color.hex(), "#ffffff");
    }

    #[test]
    fn test_clipboard_has_no_whiteboards() {
        let value = serde_json::to_value(ClipboardData::default()).unwrap();
        assert!(value.get("whiteboards").is_none());
        assert!(value.get("textLabels").is_some());
    }
}
