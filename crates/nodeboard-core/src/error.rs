//! Error types for loading scenes and parsing style values.

use thiserror::Error;

/// Errors raised while decoding a saved or shared scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported scene version {found} (newest supported is {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// A serialized style value outside the fixed option sets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleError {
    #[error("Unknown palette color: {0}")]
    UnknownColor(String),
    #[error("Unsupported stroke width: {0}")]
    UnknownStrokeWidth(f64),
    #[error("Unsupported font size: {0}")]
    UnknownFontSize(f64),
}
