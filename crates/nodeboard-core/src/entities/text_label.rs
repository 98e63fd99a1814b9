//! Free-standing text label entity.

use super::{EntityId, EntityTrait};
use crate::geometry::{rect_contains, rects_overlap};
use crate::style::{BorderStyle, FontFamily, FontSize, PaletteColor, StrokeWidth};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Default inner padding between the text and its box.
pub const DEFAULT_TEXT_PADDING: f64 = 8.0;

/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH_FACTOR: f64 = 0.6;
/// Line height as a fraction of the font size.
const LINE_HEIGHT_FACTOR: f64 = 1.2;

fn default_padding() -> f64 {
    DEFAULT_TEXT_PADDING
}

/// A text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLabel {
    pub(crate) id: EntityId,
    /// Position (top-left corner of the label box).
    pub position: Point,
    /// The text content.
    pub text: String,
    #[serde(default)]
    pub font_size: FontSize,
    #[serde(default)]
    pub color: PaletteColor,
    #[serde(default)]
    pub font_family: FontFamily,
    #[serde(default)]
    pub show_border: bool,
    #[serde(default)]
    pub border_style: BorderStyle,
    #[serde(default)]
    pub border_color: PaletteColor,
    #[serde(default)]
    pub border_width: StrokeWidth,
    #[serde(default = "default_padding")]
    pub padding: f64,
    #[serde(skip)]
    pub selected: bool,
    #[serde(skip)]
    pub dragging: bool,
}

impl TextLabel {
    /// Create a new text label with default styling.
    pub fn new(id: EntityId, position: Point, text: impl Into<String>) -> Self {
        Self {
            id,
            position,
            text: text.into(),
            font_size: FontSize::default(),
            color: PaletteColor::default(),
            font_family: FontFamily::default(),
            show_border: false,
            border_style: BorderStyle::default(),
            border_color: PaletteColor::default(),
            border_width: StrokeWidth::default(),
            padding: DEFAULT_TEXT_PADDING,
            selected: false,
            dragging: false,
        }
    }

    /// Copy of this label under a new id, shifted by `offset`.
    pub fn duplicate(&self, id: EntityId, offset: Vec2) -> Self {
        Self {
            id,
            position: self.position + offset,
            selected: false,
            dragging: false,
            ..self.clone()
        }
    }

    /// Approximate display width, derived from the longest line.
    ///
    /// The renderer does real text layout; this estimate only drives hit
    /// testing and box selection.
    pub fn width(&self) -> f64 {
        let longest = self
            .text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(1);
        longest as f64 * self.font_size.pixels() * CHAR_WIDTH_FACTOR + self.padding * 2.0
    }

    /// Approximate display height, derived from the line count.
    pub fn height(&self) -> f64 {
        let lines = self.text.lines().count().max(1);
        lines as f64 * self.font_size.pixels() * LINE_HEIGHT_FACTOR + self.padding * 2.0
    }

    /// Check if the label has no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl EntityTrait for TextLabel {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn position(&self) -> Point {
        self.position
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.width(), self.height()))
    }

    fn hit_test(&self, point: Point) -> bool {
        rect_contains(self.bounds(), point)
    }

    fn intersects_rect(&self, rect: Rect) -> bool {
        rects_overlap(self.bounds(), rect)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(text: &str) -> TextLabel {
        TextLabel::new(EntityId::new("text-0"), Point::new(100.0, 100.0), text)
    }

    #[test]
    fn test_size_from_text_length() {
        let short = label("Hi");
        let long = label("Hello there");
        assert!(long.width() > short.width());
        // 2 chars * 20px * 0.6 + 2 * 8 padding
        assert!((short.width() - 40.0).abs() < 1e-10);
        assert!((short.height() - 40.0).abs() < 1e-10);
    }

    #[test]
    fn test_multiline_height() {
        let one = label("a");
        let three = label("a\nb\nc");
        assert!((three.height() - one.height() - 48.0).abs() < 1e-10);
    }

    #[test]
    fn test_hit_test_box() {
        let l = label("Hello");
        assert!(l.hit_test(Point::new(101.0, 101.0)));
        assert!(!l.hit_test(Point::new(99.0, 101.0)));
    }

    #[test]
    fn test_blank() {
        assert!(label("   ").is_blank());
        assert!(!label("x").is_blank());
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(label("Hi")).unwrap();
        assert_eq!(value["fontSize"], 20.0);
        assert_eq!(value["showBorder"], false);
        assert_eq!(value["borderStyle"], "solid");
        assert_eq!(value["padding"], 8.0);
    }
}
