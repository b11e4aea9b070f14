//! Grid and angle snapping.

use kurbo::{Point, Vec2};

use crate::geometry::normalize_degrees;

/// Default grid size in canvas units (matches the visual grid).
pub const GRID_SIZE: f64 = 20.0;

/// Angle snap increment in degrees.
pub const ANGLE_SNAP_INCREMENT: f64 = 15.0;

fn grid_enabled(grid_size: f64) -> bool {
    grid_size.is_finite() && grid_size > 0.0
}

/// Snap a value to the nearest multiple of `grid_size`.
///
/// Returns `value` unchanged when the grid is disabled (`grid_size <= 0`).
pub fn snap(value: f64, grid_size: f64) -> f64 {
    if !grid_enabled(grid_size) {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap a point to the nearest grid intersection.
pub fn snap_point(point: Point, grid_size: f64) -> Point {
    Point::new(snap(point.x, grid_size), snap(point.y, grid_size))
}

/// Snap both components of a delta.
pub fn snap_vec(delta: Vec2, grid_size: f64) -> Vec2 {
    Vec2::new(snap(delta.x, grid_size), snap(delta.y, grid_size))
}

/// Snap an angle to the nearest increment.
/// Returns the snapped angle in degrees (0-360).
pub fn snap_angle(angle_degrees: f64, increment: f64) -> f64 {
    if !(increment.is_finite() && increment > 0.0) {
        return normalize_degrees(angle_degrees);
    }
    normalize_degrees((angle_degrees / increment).round() * increment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_point(Point::new(23.0, 47.0), 20.0), Point::new(20.0, 40.0));
    }

    #[test]
    fn test_snap_to_grid_exact() {
        assert_eq!(snap_point(Point::new(40.0, 60.0), 20.0), Point::new(40.0, 60.0));
    }

    #[test]
    fn test_snap_to_grid_round_up() {
        assert_eq!(snap_point(Point::new(31.0, 51.0), 20.0), Point::new(40.0, 60.0));
    }

    #[test]
    fn test_snap_negative_values() {
        assert_eq!(snap(-29.0, 20.0), -20.0);
        assert_eq!(snap(-31.0, 20.0), -40.0);
    }

    #[test]
    fn test_snap_disabled_grid_is_identity() {
        assert_eq!(snap(13.37, 0.0), 13.37);
        assert_eq!(snap(13.37, -5.0), 13.37);
        assert_eq!(snap(13.37, f64::NAN), 13.37);
    }

    #[test]
    fn test_snap_vec() {
        assert_eq!(snap_vec(Vec2::new(9.0, -11.0), 10.0), Vec2::new(10.0, -10.0));
    }

    #[test]
    fn test_snap_angle() {
        assert!((snap_angle(0.0, 15.0) - 0.0).abs() < f64::EPSILON);
        assert!((snap_angle(7.0, 15.0) - 0.0).abs() < f64::EPSILON);
        assert!((snap_angle(8.0, 15.0) - 15.0).abs() < f64::EPSILON);
        assert!((snap_angle(38.0, 15.0) - 45.0).abs() < f64::EPSILON);
        assert!((snap_angle(355.0, 15.0) - 0.0).abs() < f64::EPSILON);
        assert!((snap_angle(-10.0, 15.0) - 345.0).abs() < f64::EPSILON);
        assert!((snap_angle(-30.0, 15.0) - 330.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_angle_is_multiple_of_increment() {
        let mut angle = -720.0;
        while angle < 720.0 {
            let snapped = snap_angle(angle, ANGLE_SNAP_INCREMENT);
            assert!((0.0..360.0).contains(&snapped));
            let steps = snapped / ANGLE_SNAP_INCREMENT;
            assert!((steps - steps.round()).abs() < 1e-9);
            angle += 3.7;
        }
    }
}
