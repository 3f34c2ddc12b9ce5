//! Bezier curve fitting for freehand strokes.
//!
//! Recursive least-squares fit of cubic segments through a point sequence,
//! splitting at the worst point whenever a single cubic cannot stay within the
//! tolerance. Parameters are refined with Newton-Raphson before giving up on a
//! segment.

use crate::vector::{dot, norm2, perp, unit};
use kurbo::{BezPath, CubicBez, ParamCurve, ParamCurveDeriv, Point, Vec2};

/// Newton-Raphson passes tried before a segment is split.
const MAX_REPARAMETERIZE: usize = 4;
/// Segments whose error is below `tolerance * ITERATION_FACTOR` are refined
/// instead of split.
const ITERATION_FACTOR: f64 = 4.0;

/// Fit cubic Bezier segments through `points`.
///
/// Consecutive duplicate points are dropped first. Returns an empty vector for
/// fewer than two distinct points.
pub fn fit_curve(points: &[Point], tolerance: f64) -> Vec<CubicBez> {
    let pts = dedup(points);
    let mut out = Vec::new();
    if pts.len() < 2 {
        return out;
    }

    let n = pts.len();
    let left = unit(pts[1] - pts[0]).unwrap_or(Vec2::new(1.0, 0.0));
    let right = unit(pts[n - 2] - pts[n - 1]).unwrap_or(Vec2::new(-1.0, 0.0));
    fit_cubic(&pts, left, right, tolerance.max(f64::EPSILON), &mut out);
    out
}

/// Fit `points` and assemble the segments into a path.
pub fn fit_path(points: &[Point], tolerance: f64, closed: bool) -> BezPath {
    let mut path = BezPath::new();
    let curves = fit_curve(points, tolerance);
    let Some(first) = curves.first() else {
        return path;
    };
    path.move_to(first.p0);
    for c in &curves {
        path.curve_to(c.p1, c.p2, c.p3);
    }
    if closed {
        path.close_path();
    }
    path
}

/// Finite points with consecutive duplicates removed.
pub(crate) fn dedup(points: &[Point]) -> Vec<Point> {
    let mut pts: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if !p.is_finite() {
            continue;
        }
        if pts.last().is_some_and(|last| (p - *last).hypot2() < f64::EPSILON) {
            continue;
        }
        pts.push(p);
    }
    pts
}

fn fit_cubic(pts: &[Point], left: Vec2, right: Vec2, tolerance: f64, out: &mut Vec<CubicBez>) {
    let n = pts.len();
    let first = pts[0];
    let last = pts[n - 1];

    if n == 2 {
        let dist = norm2(last - first) / 3.0;
        out.push(CubicBez::new(first, first + left * dist, last + right * dist, last));
        return;
    }

    let mut u = chord_length_parameterize(pts);
    let mut bez = generate_bezier(pts, &u, left, right);
    let (mut max_err, mut split) = max_error(pts, &bez, &u);
    if max_err < tolerance {
        out.push(bez);
        return;
    }

    if max_err < tolerance * ITERATION_FACTOR {
        for _ in 0..MAX_REPARAMETERIZE {
            let refined = reparameterize(pts, &u, &bez);
            bez = generate_bezier(pts, &refined, left, right);
            (max_err, split) = max_error(pts, &bez, &refined);
            if max_err < tolerance {
                out.push(bez);
                return;
            }
            u = refined;
        }
    }

    let centre = centre_tangent(pts, split);
    fit_cubic(&pts[..=split], left, centre, tolerance, out);
    fit_cubic(&pts[split..], -centre, right, tolerance, out);
}

fn chord_length_parameterize(pts: &[Point]) -> Vec<f64> {
    let mut u = Vec::with_capacity(pts.len());
    u.push(0.0);
    for w in pts.windows(2) {
        let prev = u.last().copied().unwrap_or(0.0);
        u.push(prev + norm2(w[1] - w[0]));
    }
    let total = u.last().copied().unwrap_or(0.0);
    if total > 0.0 {
        for t in &mut u {
            *t /= total;
        }
    }
    u
}

fn bernstein(t: f64) -> [f64; 4] {
    let mt = 1.0 - t;
    [mt * mt * mt, 3.0 * t * mt * mt, 3.0 * t * t * mt, t * t * t]
}

/// Least-squares estimate of the two inner control point distances.
fn generate_bezier(pts: &[Point], u: &[f64], left: Vec2, right: Vec2) -> CubicBez {
    let n = pts.len();
    let first = pts[0];
    let last = pts[n - 1];

    let mut c = [[0.0f64; 2]; 2];
    let mut x = [0.0f64; 2];
    for (p, &t) in pts.iter().zip(u) {
        let b = bernstein(t);
        let a1 = left * b[1];
        let a2 = right * b[2];
        c[0][0] += dot(a1, a1);
        c[0][1] += dot(a1, a2);
        c[1][1] += dot(a2, a2);
        let fixed = first.to_vec2() * (b[0] + b[1]) + last.to_vec2() * (b[2] + b[3]);
        let tmp = p.to_vec2() - fixed;
        x[0] += dot(a1, tmp);
        x[1] += dot(a2, tmp);
    }
    c[1][0] = c[0][1];

    let det_c0_c1 = c[0][0] * c[1][1] - c[1][0] * c[0][1];
    let det_c0_x = c[0][0] * x[1] - c[1][0] * x[0];
    let det_x_c1 = x[0] * c[1][1] - x[1] * c[0][1];
    let (alpha_l, alpha_r) = if det_c0_c1.abs() < f64::EPSILON {
        (0.0, 0.0)
    } else {
        (det_x_c1 / det_c0_c1, det_c0_x / det_c0_c1)
    };

    let seg_len = norm2(last - first);
    let eps = 1e-6 * seg_len;
    if alpha_l < eps || alpha_r < eps || !alpha_l.is_finite() || !alpha_r.is_finite() {
        // Wildly off estimate: fall back to the Wu/Barsky heuristic.
        let dist = seg_len / 3.0;
        return CubicBez::new(first, first + left * dist, last + right * dist, last);
    }
    CubicBez::new(first, first + left * alpha_l, last + right * alpha_r, last)
}

/// Largest distance between an input point and the curve at its parameter,
/// together with the index of that point. The index is always interior.
fn max_error(pts: &[Point], bez: &CubicBez, u: &[f64]) -> (f64, usize) {
    let n = pts.len();
    let mut max = 0.0;
    let mut split = n / 2;
    for i in 1..n - 1 {
        let d = norm2(bez.eval(u[i]) - pts[i]);
        if d >= max {
            max = d;
            split = i;
        }
    }
    (max, split.clamp(1, n - 2))
}

fn reparameterize(pts: &[Point], u: &[f64], bez: &CubicBez) -> Vec<f64> {
    let d1 = bez.deriv();
    let d2 = d1.deriv();
    pts.iter()
        .zip(u)
        .map(|(&p, &t)| {
            let diff = bez.eval(t) - p;
            let q1 = d1.eval(t).to_vec2();
            let q2 = d2.eval(t).to_vec2();
            let numerator = dot(diff, q1);
            let denominator = dot(q1, q1) + dot(diff, q2);
            if denominator.abs() < f64::EPSILON {
                t
            } else {
                (t - numerator / denominator).clamp(0.0, 1.0)
            }
        })
        .collect()
}

fn centre_tangent(pts: &[Point], split: usize) -> Vec2 {
    unit(pts[split - 1] - pts[split + 1])
        .or_else(|| unit(perp(pts[split] - pts[split - 1])))
        .unwrap_or(Vec2::new(-1.0, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{ParamCurveNearest, PathEl};

    fn anchors(path: &BezPath) -> usize {
        path.elements()
            .iter()
            .filter(|el| !matches!(el, PathEl::ClosePath))
            .count()
    }

    fn distance_to_path(path: &BezPath, p: Point) -> f64 {
        path.segments()
            .map(|seg| seg.nearest(p, 1e-6).distance_sq.sqrt())
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn test_collinear_points_reduce_to_single_segment() {
        let points: Vec<Point> = (0..5).map(|i| Point::new(i as f64 * 10.0, 0.0)).collect();
        let path = fit_path(&points, 0.75, false);
        assert!(anchors(&path) < points.len());
        for p in &points {
            assert!(distance_to_path(&path, *p) <= 0.75);
        }
    }

    #[test]
    fn test_arc_points_within_tolerance() {
        let points: Vec<Point> = (0..=40)
            .map(|i| {
                let a = i as f64 / 40.0 * std::f64::consts::PI;
                Point::new(100.0 * a.cos(), 100.0 * a.sin())
            })
            .collect();
        let path = fit_path(&points, 0.75, false);
        assert!(anchors(&path) < points.len());
        for p in &points {
            assert!(distance_to_path(&path, *p) <= 0.75);
        }
    }

    #[test]
    fn test_sharp_corner_splits() {
        let mut points: Vec<Point> = (0..10).map(|i| Point::new(i as f64 * 10.0, 0.0)).collect();
        points.extend((1..10).map(|i| Point::new(90.0, i as f64 * 10.0)));
        let curves = fit_curve(&points, 0.75);
        assert!(curves.len() >= 2);
        for p in &points {
            let d = curves
                .iter()
                .map(|c| c.nearest(*p, 1e-6).distance_sq.sqrt())
                .fold(f64::INFINITY, f64::min);
            assert!(d <= 0.75, "point {p:?} is {d} away");
        }
    }

    #[test]
    fn test_duplicates_and_short_input() {
        assert!(fit_curve(&[Point::new(1.0, 1.0)], 0.75).is_empty());
        assert!(fit_curve(&[Point::new(1.0, 1.0), Point::new(1.0, 1.0)], 0.75).is_empty());
        let curves = fit_curve(&[Point::new(0.0, 0.0), Point::new(0.0, 0.0), Point::new(5.0, 0.0)], 0.75);
        assert_eq!(curves.len(), 1);
        assert_eq!(curves[0].p3, Point::new(5.0, 0.0));
    }

    #[test]
    fn test_closed_path() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let path = fit_path(&points, 0.75, true);
        assert!(matches!(path.elements().last(), Some(PathEl::ClosePath)));
    }
}
