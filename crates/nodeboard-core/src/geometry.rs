//! Geometry helpers shared by entities, hit testing and box selection.
//!
//! Points and vectors are plain `kurbo` values: `Point + Vec2` moves a point,
//! `Point - Point` yields the displacement and `Point::distance` the length.

use kurbo::{Point, Rect, Vec2};

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    point.distance(proj)
}

/// Closest point of a rectangle to `point` (the point itself when inside).
pub fn closest_point_on_rect(rect: Rect, point: Point) -> Point {
    Point::new(
        point.x.clamp(rect.x0, rect.x1),
        point.y.clamp(rect.y0, rect.y1),
    )
}

/// Circle vs axis-aligned rectangle intersection.
///
/// The circle touches the rectangle when the rectangle point closest to its
/// center lies within `radius`.
pub fn circle_intersects_rect(center: Point, radius: f64, rect: Rect) -> bool {
    closest_point_on_rect(rect, center).distance(center) <= radius
}

/// Inclusive point-in-rect test (kurbo's `Rect::contains` excludes the far edges).
pub fn rect_contains(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Inclusive overlap test for two axis-aligned rectangles.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}

/// Normalized rectangle spanned by two arbitrary corner points.
pub fn rect_from_corners(p1: Point, p2: Point) -> Rect {
    Rect::new(
        p1.x.min(p2.x),
        p1.y.min(p2.y),
        p1.x.max(p2.x),
        p1.y.max(p2.y),
    )
}

/// Point on a circle's boundary in the direction of `toward`.
///
/// When `toward` coincides with the center the boundary point to the right is
/// returned, so callers always get a finite point.
pub fn circle_boundary_point(center: Point, radius: f64, toward: Point) -> Point {
    let dir = toward - center;
    let len = dir.hypot();
    if len < f64::EPSILON {
        return center + Vec2::new(radius, 0.0);
    }
    center + dir * (radius / len)
}
