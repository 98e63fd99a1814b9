//! Style value types attached to nodes, arrows and text labels.
//!
//! Every style property is a closed enumeration so the properties panel can
//! offer a fixed set of options and saved documents stay portable.

use crate::error::StyleError;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// The fixed color palette (14 entries, including transparent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaletteColor {
    Transparent,
    #[default]
    Black,
    White,
    Gray,
    Red,
    Pink,
    Grape,
    Violet,
    Blue,
    Cyan,
    Teal,
    Green,
    Yellow,
    Orange,
}

impl PaletteColor {
    /// Get all palette entries in display order.
    pub fn all() -> &'static [PaletteColor] {
        &[
            PaletteColor::Transparent,
            PaletteColor::Black,
            PaletteColor::White,
            PaletteColor::Gray,
            PaletteColor::Red,
            PaletteColor::Pink,
            PaletteColor::Grape,
            PaletteColor::Violet,
            PaletteColor::Blue,
            PaletteColor::Cyan,
            PaletteColor::Teal,
            PaletteColor::Green,
            PaletteColor::Yellow,
            PaletteColor::Orange,
        ]
    }

    /// Serialized form: `#rrggbb`, or `transparent`.
    pub fn hex(&self) -> &'static str {
        match self {
            PaletteColor::Transparent => "transparent",
            PaletteColor::Black => "#1e1e1e",
            PaletteColor::White => "#ffffff",
            PaletteColor::Gray => "#868e96",
            PaletteColor::Red => "#e03131",
            PaletteColor::Pink => "#c2255c",
            PaletteColor::Grape => "#9c36b5",
            PaletteColor::Violet => "#6741d9",
            PaletteColor::Blue => "#1971c2",
            PaletteColor::Cyan => "#0c8599",
            PaletteColor::Teal => "#099268",
            PaletteColor::Green => "#2f9e44",
            PaletteColor::Yellow => "#f08c00",
            PaletteColor::Orange => "#e8590c",
        }
    }

    /// Get display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            PaletteColor::Transparent => "Transparent",
            PaletteColor::Black => "Black",
            PaletteColor::White => "White",
            PaletteColor::Gray => "Gray",
            PaletteColor::Red => "Red",
            PaletteColor::Pink => "Pink",
            PaletteColor::Grape => "Grape",
            PaletteColor::Violet => "Violet",
            PaletteColor::Blue => "Blue",
            PaletteColor::Cyan => "Cyan",
            PaletteColor::Teal => "Teal",
            PaletteColor::Green => "Green",
            PaletteColor::Yellow => "Yellow",
            PaletteColor::Orange => "Orange",
        }
    }

    /// Look up a palette entry by its serialized form (case-insensitive).
    pub fn from_hex(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.hex().eq_ignore_ascii_case(value))
    }

    /// Check if this is the transparent entry.
    pub fn is_transparent(&self) -> bool {
        matches!(self, PaletteColor::Transparent)
    }

    /// Get the color as a peniko Color for rendering.
    pub fn to_color(&self) -> Color {
        let Some(hex) = self.hex().strip_prefix('#') else {
            return Color::TRANSPARENT;
        };
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        Color::from_rgba8(channel(0), channel(2), channel(4), 255)
    }
}

impl TryFrom<String> for PaletteColor {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or(StyleError::UnknownColor(value))
    }
}

impl From<PaletteColor> for String {
    fn from(color: PaletteColor) -> Self {
        color.hex().to_string()
    }
}

impl From<PaletteColor> for Color {
    fn from(color: PaletteColor) -> Self {
        color.to_color()
    }
}

/// Stroke width levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum StrokeWidth {
    Thin,
    #[default]
    Regular,
    Bold,
    ExtraBold,
}

impl StrokeWidth {
    /// Get all stroke widths, thinnest first.
    pub fn all() -> &'static [StrokeWidth] {
        &[
            StrokeWidth::Thin,
            StrokeWidth::Regular,
            StrokeWidth::Bold,
            StrokeWidth::ExtraBold,
        ]
    }

    /// Width in world units.
    pub fn width(&self) -> f64 {
        match self {
            StrokeWidth::Thin => 1.0,
            StrokeWidth::Regular => 2.0,
            StrokeWidth::Bold => 4.0,
            StrokeWidth::ExtraBold => 6.0,
        }
    }

    /// Cycle to the next stroke width.
    pub fn next(self) -> Self {
        match self {
            StrokeWidth::Thin => StrokeWidth::Regular,
            StrokeWidth::Regular => StrokeWidth::Bold,
            StrokeWidth::Bold => StrokeWidth::ExtraBold,
            StrokeWidth::ExtraBold => StrokeWidth::Thin,
        }
    }
}

impl TryFrom<f64> for StrokeWidth {
    type Error = StyleError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::all()
            .iter()
            .copied()
            .find(|w| (w.width() - value).abs() < f64::EPSILON)
            .ok_or(StyleError::UnknownStrokeWidth(value))
    }
}

impl From<StrokeWidth> for f64 {
    fn from(width: StrokeWidth) -> Self {
        width.width()
    }
}

/// Fill style for node backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillStyle {
    #[default]
    Solid,
    Hachure,
    CrossHatch,
    None,
}

impl FillStyle {
    /// Get all fill styles.
    pub fn all() -> &'static [FillStyle] {
        &[
            FillStyle::Solid,
            FillStyle::Hachure,
            FillStyle::CrossHatch,
            FillStyle::None,
        ]
    }

    /// Cycle to the next fill style.
    pub fn next(self) -> Self {
        match self {
            FillStyle::Solid => FillStyle::Hachure,
            FillStyle::Hachure => FillStyle::CrossHatch,
            FillStyle::CrossHatch => FillStyle::None,
            FillStyle::None => FillStyle::Solid,
        }
    }
}

/// Line style for arrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    /// Get all line styles.
    pub fn all() -> &'static [LineStyle] {
        &[LineStyle::Solid, LineStyle::Dashed, LineStyle::Dotted]
    }

    /// Dash pattern (dash, gap) in world units, `None` for a solid line.
    pub fn dash_pattern(&self, stroke_width: f64) -> Option<(f64, f64)> {
        match self {
            LineStyle::Solid => None,
            LineStyle::Dashed => Some((8.0 + stroke_width * 2.0, 6.0 + stroke_width)),
            LineStyle::Dotted => Some((1.5, 4.0 + stroke_width * 1.5)),
        }
    }

    /// Cycle to the next line style.
    pub fn next(self) -> Self {
        match self {
            LineStyle::Solid => LineStyle::Dashed,
            LineStyle::Dashed => LineStyle::Dotted,
            LineStyle::Dotted => LineStyle::Solid,
        }
    }
}

/// Border line style for text labels. Whether a border is drawn at all is a
/// separate flag on the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl BorderStyle {
    /// Get all border styles.
    pub fn all() -> &'static [BorderStyle] {
        &[BorderStyle::Solid, BorderStyle::Dashed, BorderStyle::Dotted]
    }
}

/// Font family options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Hand-drawn style font (default).
    #[default]
    Handwritten,
    /// Clean sans-serif font.
    Sans,
    /// Monospace font for code.
    Mono,
}

impl FontFamily {
    /// Get the font family name as used by the renderer.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::Handwritten => "Virgil",
            FontFamily::Sans => "Helvetica",
            FontFamily::Mono => "Cascadia",
        }
    }

    /// Get all available font families.
    pub fn all() -> &'static [FontFamily] {
        &[FontFamily::Handwritten, FontFamily::Sans, FontFamily::Mono]
    }
}

/// Text label font size levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    /// Font size used for node captions; nodes do not offer a size choice.
    pub const NODE: f64 = 16.0;

    /// Get all font sizes, smallest first.
    pub fn all() -> &'static [FontSize] {
        &[FontSize::Small, FontSize::Medium, FontSize::Large]
    }

    /// Size in pixels.
    pub fn pixels(&self) -> f64 {
        match self {
            FontSize::Small => 16.0,
            FontSize::Medium => 20.0,
            FontSize::Large => 28.0,
        }
    }
}

impl TryFrom<f64> for FontSize {
    type Error = StyleError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::all()
            .iter()
            .copied()
            .find(|s| (s.pixels() - value).abs() < f64::EPSILON)
            .ok_or(StyleError::UnknownFontSize(value))
    }
}

impl From<FontSize> for f64 {
    fn from(size: FontSize) -> Self {
        size.pixels()
    }
}

/// Style properties of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    pub stroke_color: PaletteColor,
    pub background_color: PaletteColor,
    #[serde(default)]
    pub fill_style: FillStyle,
    #[serde(default)]
    pub stroke_width: StrokeWidth,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            stroke_color: PaletteColor::Black,
            background_color: PaletteColor::Transparent,
            fill_style: FillStyle::default(),
            stroke_width: StrokeWidth::default(),
            opacity: 1.0,
        }
    }
}

impl NodeStyle {
    /// Stroke color with opacity applied.
    pub fn stroke_with_opacity(&self) -> Color {
        self.stroke_color.to_color().multiply_alpha(self.opacity as f32)
    }

    /// Fill color with opacity applied, `None` when nothing is painted.
    pub fn fill_with_opacity(&self) -> Option<Color> {
        if self.fill_style == FillStyle::None || self.background_color.is_transparent() {
            return None;
        }
        Some(self.background_color.to_color().multiply_alpha(self.opacity as f32))
    }
}

/// A partial style update issued by the properties panel.
///
/// Each field left as `None` is untouched; fields that do not apply to an
/// entity type are ignored for that entity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StylePatch {
    pub stroke_color: Option<PaletteColor>,
    pub background_color: Option<PaletteColor>,
    pub fill_style: Option<FillStyle>,
    pub stroke_width: Option<StrokeWidth>,
    pub opacity: Option<f64>,
    pub line_style: Option<LineStyle>,
    pub font_family: Option<FontFamily>,
    pub font_size: Option<FontSize>,
    pub show_border: Option<bool>,
    pub border_style: Option<BorderStyle>,
    pub border_color: Option<PaletteColor>,
    pub border_width: Option<StrokeWidth>,
    pub padding: Option<f64>,
}

impl StylePatch {
    /// Apply the node-relevant fields to a node style.
    pub fn apply_to_node_style(&self, style: &mut NodeStyle) {
        if let Some(c) = self.stroke_color {
            style.stroke_color = c;
        }
        if let Some(c) = self.background_color {
            style.background_color = c;
        }
        if let Some(f) = self.fill_style {
            style.fill_style = f;
        }
        if let Some(w) = self.stroke_width {
            style.stroke_width = w;
        }
        if let Some(o) = self.opacity {
            style.opacity = o.clamp(0.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_set_sizes() {
        assert_eq!(PaletteColor::all().len(), 14);
        assert_eq!(StrokeWidth::all().len(), 4);
        assert_eq!(FillStyle::all().len(), 4);
        assert_eq!(FontFamily::all().len(), 3);
        assert_eq!(BorderStyle::all().len(), 3);
        assert_eq!(LineStyle::all().len(), 3);
        assert_eq!(FontSize::all().len(), 3);
    }

    #[test]
    fn test_color_serializes_as_hex() {
        let json = serde_json::to_string(&PaletteColor::Blue).unwrap();
        assert_eq!(json, "\"#1971c2\"");
        let back: PaletteColor = serde_json::from_str("\"#1971C2\"").unwrap();
        assert_eq!(back, PaletteColor::Blue);
    }

    #[test]
    fn test_unknown_color_rejected() {
        let result: Result<PaletteColor, _> = serde_json::from_str("\"#123456\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_stroke_width_numeric() {
        let json = serde_json::to_string(&StrokeWidth::Bold).unwrap();
        assert_eq!(json, "4.0");
        let back: StrokeWidth = serde_json::from_str("6").unwrap();
        assert_eq!(back, StrokeWidth::ExtraBold);
        assert!(serde_json::from_str::<StrokeWidth>("3").is_err());
    }

    #[test]
    fn test_fill_style_names() {
        let json = serde_json::to_string(&FillStyle::CrossHatch).unwrap();
        assert_eq!(json, "\"cross-hatch\"");
    }

    #[test]
    fn test_palette_to_color() {
        let c = PaletteColor::White.to_color().to_rgba8();
        assert_eq!((c.r, c.g, c.b, c.a), (255, 255, 255, 255));
        assert_eq!(PaletteColor::Transparent.to_color().to_rgba8().a, 0);
    }

    #[test]
    fn test_patch_clamps_opacity() {
        let mut style = NodeStyle::default();
        let patch = StylePatch {
            opacity: Some(3.0),
            stroke_color: Some(PaletteColor::Red),
            ..Default::default()
        };
        patch.apply_to_node_style(&mut style);
        assert!((style.opacity - 1.0).abs() < f64::EPSILON);
        assert_eq!(style.stroke_color, PaletteColor::Red);
    }

    #[test]
    fn test_cycles() {
        assert_eq!(StrokeWidth::ExtraBold.next(), StrokeWidth::Thin);
        assert_eq!(FillStyle::None.next(), FillStyle::Solid);
        assert_eq!(LineStyle::Dotted.next(), LineStyle::Solid);
    }
}
