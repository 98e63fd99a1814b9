//! View state: the pan/zoom transform between screen and world coordinates.

use crate::error::SceneError;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest allowed zoom factor.
pub const MAX_ZOOM: f64 = 5.0;

/// Current pan offset and zoom of the canvas.
///
/// A world point `w` is drawn at `w * zoom + pan` on screen. The view state
/// is persisted separately from the scene as `{ zoom, panX, panY }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ViewStateData", into = "ViewStateData")]
pub struct ViewState {
    /// Current zoom level (1.0 = 100%)
    pub zoom: f64,
    /// Current translation offset in screen pixels
    pub pan: Vec2,
}

/// Persisted form of [`ViewState`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewStateData {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
}

impl From<ViewStateData> for ViewState {
    fn from(data: ViewStateData) -> Self {
        // Zoom is clamped on load to the same range enforced at runtime.
        let zoom = if data.zoom.is_finite() {
            data.zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            1.0
        };
        Self {
            zoom,
            pan: Vec2::new(data.pan_x, data.pan_y),
        }
    }
}

impl From<ViewState> for ViewStateData {
    fn from(view: ViewState) -> Self {
        Self {
            zoom: view.zoom,
            pan_x: view.pan.x,
            pan_y: view.pan.y,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the affine transform for rendering (world to screen).
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling (screen to world).
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.pan)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan by a delta in screen coordinates.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Set the zoom level, keeping `screen_point` visually fixed.
    ///
    /// The pan is adjusted by the zoom ratio:
    /// `new_pan = point - (point - old_pan) * (new_zoom / old_zoom)`.
    pub fn zoom_at(&mut self, screen_point: Point, new_zoom: f64) {
        let new_zoom = new_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        let ratio = new_zoom / self.zoom;
        let anchor = screen_point.to_vec2();
        self.pan = anchor - (anchor - self.pan) * ratio;
        self.zoom = new_zoom;
    }

    /// Multiply the zoom level by `factor` around `screen_point`.
    pub fn zoom_by(&mut self, screen_point: Point, factor: f64) {
        self.zoom_at(screen_point, self.zoom * factor);
    }

    /// Reset to 100% with no pan.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fit the view so `bounds` fills the viewport, minus `padding` on each side.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64) {
        if bounds.is_zero_area() {
            self.reset();
            return;
        }

        let padded_viewport = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );

        let scale_x = padded_viewport.width / bounds.width();
        let scale_y = padded_viewport.height / bounds.height();
        self.zoom = scale_x.min(scale_y).clamp(MIN_ZOOM, MAX_ZOOM);

        // Center the bounds in the viewport
        let bounds_center = bounds.center();
        self.pan = Vec2::new(
            viewport.width / 2.0 - bounds_center.x * self.zoom,
            viewport.height / 2.0 - bounds_center.y * self.zoom,
        );
    }

    /// Serialize to the persisted `{ zoom, panX, panY }` form.
    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the persisted form, clamping the zoom.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_view() {
        let view = ViewState::new();
        assert_eq!(view.pan, Vec2::ZERO);
        assert!((view.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_pan_and_zoom() {
        let view = ViewState {
            zoom: 2.0,
            pan: Vec2::new(50.0, 100.0),
        };
        let world = view.screen_to_world(Point::new(150.0, 300.0));
        assert!((world.x - 50.0).abs() < f64::EPSILON);
        assert!((world.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let view = ViewState {
            zoom: 1.5,
            pan: Vec2::new(30.0, -20.0),
        };
        let original = Point::new(123.0, 456.0);
        let back = view.world_to_screen(view.screen_to_world(original));
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut view = ViewState {
            zoom: 1.0,
            pan: Vec2::new(10.0, 20.0),
        };
        let anchor = Point::new(200.0, 100.0);
        let before = view.screen_to_world(anchor);
        view.zoom_at(anchor, 2.0);
        let after = view.screen_to_world(anchor);
        assert!((before.x - after.x).abs() < 1e-10);
        assert!((before.y - after.y).abs() < 1e-10);
        // new_pan = point - (point - old_pan) * ratio
        assert!((view.pan.x - (200.0 - 190.0 * 2.0)).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut view = ViewState::new();
        view.zoom_by(Point::ZERO, 0.001);
        assert!((view.zoom - MIN_ZOOM).abs() < f64::EPSILON);
        view.zoom_by(Point::ZERO, 1000.0);
        assert!((view.zoom - MAX_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_persisted_form() {
        let view = ViewState {
            zoom: 1.25,
            pan: Vec2::new(-4.0, 8.0),
        };
        let value = serde_json::to_value(view).unwrap();
        assert_eq!(value["zoom"], 1.25);
        assert_eq!(value["panX"], -4.0);
        assert_eq!(value["panY"], 8.0);
    }

    #[test]
    fn test_zoom_clamped_on_load() {
        let view = ViewState::from_json(r#"{"zoom": 40, "panX": 1, "panY": 2}"#).unwrap();
        assert!((view.zoom - MAX_ZOOM).abs() < f64::EPSILON);
        assert_eq!(view.pan, Vec2::new(1.0, 2.0));

        let view = ViewState::from_json(r#"{"zoom": 0.0, "panX": 0, "panY": 0}"#).unwrap();
        assert!((view.zoom - MIN_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fit_to_bounds() {
        let mut view = ViewState::new();
        view.fit_to_bounds(
            Rect::new(0.0, 0.0, 200.0, 100.0),
            Size::new(400.0, 400.0),
            0.0,
        );
        assert!((view.zoom - 2.0).abs() < f64::EPSILON);
        let center = view.world_to_screen(Point::new(100.0, 50.0));
        assert!((center.x - 200.0).abs() < 1e-10);
        assert!((center.y - 200.0).abs() < 1e-10);
    }
}
