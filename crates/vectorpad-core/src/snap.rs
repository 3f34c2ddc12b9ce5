//! Grid snapping for whole-shape moves.

use kurbo::{Point, Vec2};

/// Snap a point to the nearest grid intersection.
///
/// A non-positive or non-finite grid leaves the point unchanged.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    if !(grid_size.is_finite() && grid_size > 0.0) {
        return point;
    }
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

/// Delta that takes `current` to the snapped position of `target`.
///
/// Used with an unsnapped accumulator: `target` keeps the raw pointer
/// travel so sub-grid motion is not lost between moves.
pub fn snapped_delta(current: Point, target: Point, grid_size: f64) -> Vec2 {
    snap_to_grid(target, grid_size) - current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(Point::new(23.0, 47.0), 20.0), Point::new(20.0, 40.0));
        assert_eq!(snap_to_grid(Point::new(40.0, 60.0), 20.0), Point::new(40.0, 60.0));
        assert_eq!(snap_to_grid(Point::new(31.0, 51.0), 20.0), Point::new(40.0, 60.0));
    }

    #[test]
    fn test_invalid_grid_is_identity() {
        let p = Point::new(3.3, 4.4);
        assert_eq!(snap_to_grid(p, 0.0), p);
        assert_eq!(snap_to_grid(p, f64::NAN), p);
    }

    #[test]
    fn test_small_steps_accumulate() {
        // Two 4-unit steps stay put, the third crosses the half-grid mark.
        let mut current = Point::new(0.0, 0.0);
        let mut raw = current;
        for step in 1..=4 {
            raw += Vec2::new(4.0, 0.0);
            current += snapped_delta(current, raw, 20.0);
            let expected = if step < 3 { 0.0 } else { 20.0 };
            assert_eq!(current.x, expected, "step {step}");
        }
    }
}
