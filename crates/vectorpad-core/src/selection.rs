//! Per-gesture interaction state and rotation.

use crate::shapes::{Shape, ShapeId, ShapeKind};
use crate::vector::{dot, normalize_angle, perp, unit};
use crate::widget::HandleKind;
use kurbo::{Point, Vec2};

/// State of one drag gesture, from pointer-down to pointer-up.
///
/// Never persisted and never owned by a shape. The shape as it was at
/// pointer-down is kept so the gesture can be aborted.
#[derive(Debug, Clone)]
pub struct InteractionContext {
    /// Index of the shape in the document list.
    pub index: usize,
    pub shape_id: ShapeId,
    /// Engaged handle; `None` until a handle or the body is hit.
    pub handle: Option<HandleKind>,
    /// Reference-vertex quadrant, resolved on the first picture resize step.
    pub quadrant: Option<usize>,
    /// Picture mirroring, resolved together with the quadrant.
    pub mirrored: Option<bool>,
    /// Pointer position at pointer-down.
    pub start_point: Point,
    /// Latest pointer position.
    pub current_point: Point,
    /// Unsnapped anchor for grid-snapped moves.
    pub unsnapped: Option<Point>,
    /// Original shape state for cancel.
    pub original_shape: Shape,
}

impl InteractionContext {
    pub fn new(index: usize, pointer: Point, original_shape: Shape) -> Self {
        Self {
            index,
            shape_id: original_shape.id(),
            handle: None,
            quadrant: None,
            mirrored: None,
            start_point: pointer,
            current_point: pointer,
            unsnapped: None,
            original_shape,
        }
    }

    /// Total drag so far.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Record a new pointer position and return the step since the last one.
    pub fn advance(&mut self, pointer: Point) -> Vec2 {
        let step = pointer - self.current_point;
        self.current_point = pointer;
        step
    }
}

/// Signed angle from `a` to `b`, `None` when either has no length.
pub fn rotation_delta(a: Vec2, b: Vec2) -> Option<f64> {
    let a = unit(a)?;
    let b = unit(b)?;
    let cos = dot(a, b);
    let sin = dot(perp(a), b);
    Some(sin.atan2(cos))
}

/// Rotate `shape` by the angle swept from `prev` to `curr` around its centre.
///
/// Lines are re-aimed: `prev` and `curr` are used as vectors as given, so
/// callers pass pointer offsets (see [`crate::Canvas::rotate_gesture`]).
/// Returns `false` (and leaves the shape alone) when either vector is zero.
pub fn apply_rotation(shape: &mut Shape, prev: Point, curr: Point) -> bool {
    let (a, b) = if shape.kind() == ShapeKind::Line {
        (prev.to_vec2(), curr.to_vec2())
    } else {
        let centre = shape.rotation_centre();
        (prev - centre, curr - centre)
    };
    match rotation_delta(a, b) {
        Some(delta) => {
            let angle = normalize_angle(shape.angle() + delta);
            shape.set_angle(angle);
            log::trace!("rotated {} by {delta:.4} to {angle:.4}", shape.id());
            true
        }
        None => {
            log::trace!("rotation of {} skipped: pointer at centre", shape.id());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Figure, Line, Picture};
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_rotate_square_quarter_turn() {
        let mut square: Shape = Figure::rectangle(Point::new(0.0, 0.0), Point::new(10.0, 10.0)).into();
        let centre = square.rotation_centre();
        assert!((centre - Point::new(5.0, 5.0)).hypot() < 1e-9);
        let prev = centre + Vec2::new(1.0, 0.0);
        let curr = centre + Vec2::new(0.0, 1.0);
        assert!(apply_rotation(&mut square, prev, curr));
        assert!((square.angle() - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_wraps() {
        let mut picture: Shape = Picture::new(Point::ZERO, 10.0, 10.0).into();
        picture.set_angle(PI - 0.1);
        let c = picture.rotation_centre();
        let a = Vec2::new(1.0, 0.0);
        let b = Vec2::new(0.2f64.cos(), 0.2f64.sin());
        assert!(apply_rotation(&mut picture, c + a, c + b));
        assert!((picture.angle() - (-PI + 0.1)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_vector_is_noop() {
        let mut square: Shape = Figure::rectangle(Point::new(0.0, 0.0), Point::new(10.0, 10.0)).into();
        let centre = square.rotation_centre();
        assert!(!apply_rotation(&mut square, centre, Point::new(20.0, 5.0)));
        assert_eq!(square.angle(), 0.0);
    }

    #[test]
    fn test_line_uses_raw_vectors() {
        let mut line: Shape = Line::new(Point::new(100.0, 100.0), Point::new(200.0, 100.0)).into();
        assert!(apply_rotation(&mut line, Point::new(1.0, 0.0), Point::new(0.0, -1.0)));
        assert!((line.angle() + FRAC_PI_2).abs() < 1e-9);
        assert!(!apply_rotation(&mut line, Point::ZERO, Point::new(1.0, 1.0)));
    }

    #[test]
    fn test_context_advance() {
        let shape: Shape = Line::new(Point::ZERO, Point::new(1.0, 1.0)).into();
        let mut ctx = InteractionContext::new(0, Point::new(10.0, 10.0), shape);
        assert_eq!(ctx.advance(Point::new(13.0, 14.0)), Vec2::new(3.0, 4.0));
        assert_eq!(ctx.advance(Point::new(15.0, 14.0)), Vec2::new(2.0, 0.0));
        assert_eq!(ctx.delta(), Vec2::new(5.0, 4.0));
    }
}
