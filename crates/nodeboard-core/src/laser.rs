//! Laser pointer trail: a short-lived, fading sequence of pointer positions.
//!
//! The trail is purely visual. It is never part of the scene and never
//! serialized. Points age out on their own, so the host must call
//! [`LaserTrail::prune`] every frame while the trail is non-empty.

use kurbo::Point;
use std::collections::VecDeque;
use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// How long a point stays visible.
pub const LASER_MAX_AGE: Duration = Duration::from_millis(800);
/// Upper bound on buffered points.
pub const LASER_MAX_POINTS: usize = 100;

/// A single trail sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaserPoint {
    pub point: Point,
    pub timestamp: Instant,
}

/// Bounded, time-decayed point buffer.
#[derive(Debug, Clone)]
pub struct LaserTrail {
    points: VecDeque<LaserPoint>,
    max_age: Duration,
    max_points: usize,
}

impl Default for LaserTrail {
    fn default() -> Self {
        Self::new(LASER_MAX_AGE, LASER_MAX_POINTS)
    }
}

impl LaserTrail {
    pub fn new(max_age: Duration, max_points: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(max_points),
            max_age,
            max_points,
        }
    }

    /// Append a sample, dropping the oldest one when the buffer is full.
    pub fn push(&mut self, point: Point, now: Instant) {
        if self.points.len() >= self.max_points {
            self.points.pop_front();
        }
        self.points.push_back(LaserPoint {
            point,
            timestamp: now,
        });
    }

    /// Drop samples older than the maximum age. Returns true while anything
    /// is left to draw.
    pub fn prune(&mut self, now: Instant) -> bool {
        while let Some(front) = self.points.front() {
            if now.saturating_duration_since(front.timestamp) >= self.max_age {
                self.points.pop_front();
            } else {
                break;
            }
        }
        !self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Opacity of a sample at `now`: 1.0 when fresh, falling linearly to 0.0
    /// at the maximum age.
    pub fn opacity(&self, sample: &LaserPoint, now: Instant) -> f64 {
        let age = now.saturating_duration_since(sample.timestamp).as_secs_f64();
        (1.0 - age / self.max_age.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Samples oldest first, paired with their current opacity.
    pub fn points_with_opacity(&self, now: Instant) -> impl Iterator<Item = (Point, f64)> + '_ {
        self.points
            .iter()
            .map(move |sample| (sample.point, self.opacity(sample, now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_bound() {
        let mut trail = LaserTrail::default();
        let t0 = Instant::now();
        for i in 0..150 {
            trail.push(Point::new(i as f64, 0.0), t0);
        }
        assert_eq!(trail.len(), LASER_MAX_POINTS);
        // Oldest samples were dropped
        let first = trail.points_with_opacity(t0).next().unwrap();
        assert!((first.0.x - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_prune_by_age() {
        let mut trail = LaserTrail::default();
        let t0 = Instant::now();
        trail.push(Point::new(0.0, 0.0), t0);
        trail.push(Point::new(1.0, 0.0), t0 + Duration::from_millis(500));

        assert!(trail.prune(t0 + Duration::from_millis(900)));
        assert_eq!(trail.len(), 1);

        assert!(!trail.prune(t0 + Duration::from_millis(1400)));
        assert!(trail.is_empty());
    }

    #[test]
    fn test_opacity_decays_linearly() {
        let mut trail = LaserTrail::default();
        let t0 = Instant::now();
        trail.push(Point::ZERO, t0);

        let fresh: Vec<_> = trail.points_with_opacity(t0).collect();
        assert!((fresh[0].1 - 1.0).abs() < 1e-9);

        let half: Vec<_> = trail.points_with_opacity(t0 + Duration::from_millis(400)).collect();
        assert!((half[0].1 - 0.5).abs() < 1e-9);

        let gone: Vec<_> = trail.points_with_opacity(t0 + Duration::from_millis(2000)).collect();
        assert!(gone[0].1.abs() < 1e-9);
    }
}
