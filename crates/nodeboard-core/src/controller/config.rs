//! Tunable interaction thresholds.
//!
//! Pixel values are screen pixels; the controller divides them by the
//! current zoom before testing against world geometry.

use crate::scene::DUPLICATE_OFFSET;
use serde::{Deserialize, Serialize};

/// Arrow shaft hit distance in screen pixels.
pub const ARROW_HIT_THRESHOLD_PX: f64 = 10.0;
/// Half the side of a whiteboard resize handle in screen pixels.
pub const RESIZE_HANDLE_HALF_SIZE_PX: f64 = 6.0;
/// How far past the source node's edge an arrow must be dropped on empty
/// space to spawn a new node.
pub const ARROW_DROP_MARGIN: f64 = 80.0;
/// Minimum box-select span on either axis in screen pixels.
pub const BOX_SELECT_THRESHOLD: f64 = 5.0;
/// Zoom change per wheel delta unit.
pub const WHEEL_ZOOM_SENSITIVITY: f64 = 0.01;

/// Interaction thresholds. Missing fields fall back to the defaults, so a
/// host can load a partial JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionConfig {
    pub arrow_hit_threshold: f64,
    pub resize_handle_half_size: f64,
    pub arrow_drop_margin: f64,
    pub box_select_threshold: f64,
    pub duplicate_offset: f64,
    pub paste_offset: f64,
    pub wheel_zoom_sensitivity: f64,
    /// Caption given to nodes created by the node tool or an arrow drop.
    pub new_node_text: String,
    /// Placeholder text of new text labels.
    pub new_text_label_text: String,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            arrow_hit_threshold: ARROW_HIT_THRESHOLD_PX,
            resize_handle_half_size: RESIZE_HANDLE_HALF_SIZE_PX,
            arrow_drop_margin: ARROW_DROP_MARGIN,
            box_select_threshold: BOX_SELECT_THRESHOLD,
            duplicate_offset: DUPLICATE_OFFSET,
            paste_offset: DUPLICATE_OFFSET,
            wheel_zoom_sensitivity: WHEEL_ZOOM_SENSITIVITY,
            new_node_text: "New Node".to_string(),
            new_text_label_text: "Text".to_string(),
        }
    }
}

impl InteractionConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
