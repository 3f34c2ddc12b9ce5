//! Vector primitives used by the geometry and interaction code.
//!
//! Everything here is a pure function over kurbo values. Nothing mutates a
//! point in place: callers that want an updated point assign the result.

use kurbo::{Point, Vec2};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

/// Angles this close to a quadrant boundary are treated as lying on it.
///
/// `atan2` of a rotated unit vector lands a few ulps either side of the exact
/// boundary, which would otherwise classify `rotate((1, 0), PI / 4)` into a
/// different band than the angle `PI / 4` itself.
const BOUNDARY_EPSILON: f64 = 1e-9;

/// Rotate a point about the origin by `theta` radians.
pub fn rotate(point: Point, theta: f64) -> Point {
    rotate_vec(point.to_vec2(), theta).to_point()
}

/// Rotate a vector by `theta` radians.
pub fn rotate_vec(v: Vec2, theta: f64) -> Vec2 {
    let (sin, cos) = theta.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Rotate a point about `centre` by `theta` radians.
pub fn rotate_about(point: Point, centre: Point, theta: f64) -> Point {
    centre + rotate_vec(point - centre, theta)
}

/// Translate a point by `(dx, dy)`.
pub fn translate(point: Point, dx: f64, dy: f64) -> Point {
    Point::new(point.x + dx, point.y + dy)
}

/// Scale a point about the origin.
pub fn scale(point: Point, factor: f64) -> Point {
    Point::new(point.x * factor, point.y * factor)
}

pub fn dot(a: Vec2, b: Vec2) -> f64 {
    a.x * b.x + a.y * b.y
}

/// Euclidean length.
pub fn norm2(v: Vec2) -> f64 {
    v.x.hypot(v.y)
}

/// Counter-clockwise perpendicular `(-y, x)`.
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Polar angle of `(dx, dy)`.
pub fn declination(dx: f64, dy: f64) -> f64 {
    dy.atan2(dx)
}

/// Classify an angle into one of four quarter-turn bands.
///
/// Band 0 spans `[-PI/4, PI/4)`, band 1 `[PI/4, 3PI/4)`, band 2
/// `[3PI/4, PI]` together with `[-PI, -3PI/4)`, band 3 `[-3PI/4, -PI/4)`.
/// With screen coordinates (y down) successive bands run clockwise.
pub fn quadrant(theta: f64) -> usize {
    if !theta.is_finite() {
        return 0;
    }
    let t = (normalize_angle(theta) + FRAC_PI_4) / FRAC_PI_2;
    let nearest = t.round();
    let band = if (t - nearest).abs() < BOUNDARY_EPSILON {
        nearest
    } else {
        t.floor()
    };
    (band as i64).rem_euclid(4) as usize
}

/// Wrap an angle into `(-PI, PI]`. Non-finite input collapses to zero.
pub fn normalize_angle(theta: f64) -> f64 {
    if !theta.is_finite() {
        return 0.0;
    }
    let wrapped = theta.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Residual of `theta` once the nearest whole quarter turn is removed.
///
/// The result lies in `[-PI/4, PI/4)` and `theta == quadrant(theta) * PI/2 + residual`
/// up to wrapping.
pub fn quarter_residual(theta: f64) -> f64 {
    normalize_angle(theta - quadrant(theta) as f64 * FRAC_PI_2)
}

/// Rotate a vector by `turns` exact quarter turns (counter-clockwise in maths
/// orientation, clockwise on a y-down screen).
///
/// Uses [`perp`] so that axis-aligned vectors stay exactly axis-aligned.
pub fn quarter_turns(v: Vec2, turns: usize) -> Vec2 {
    (0..turns % 4).fold(v, |acc, _| perp(acc))
}

/// Signed area of the triangle `a, b, c` (shoelace formula).
pub fn signed_area(a: Point, b: Point, c: Point) -> f64 {
    ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)) / 2.0
}

/// Unit vector in the direction of `v`, or `None` when `v` has no length.
pub fn unit(v: Vec2) -> Option<Vec2> {
    let len = norm2(v);
    if len < f64::EPSILON || !len.is_finite() {
        None
    } else {
        Some(v / len)
    }
}
