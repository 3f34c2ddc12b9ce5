//! Path construction from control points.
//!
//! Paths are built in untransformed shape space. Rotation is never baked in;
//! renderers and hit-testing apply [`crate::shapes::Shape::transform`] on top.

mod fit;

pub use fit::{fit_curve, fit_path};

use crate::config::GeometryConfig;
use crate::error::{GeometryError, GeometryResult};
use crate::shapes::ShapeKind;
use kurbo::{BezPath, Ellipse, PathEl, Point, Rect, RoundedRect, Shape as KurboShape};

/// Flattening accuracy used when converting kurbo primitives to paths.
const PATH_ACCURACY: f64 = 0.1;

/// Build the renderable path for `kind` from its control points.
///
/// Fails with [`GeometryError::InsufficientGeometry`] when the point count does
/// not match what the kind needs. Renderers treat that as "nothing to draw yet".
pub fn build_path(kind: ShapeKind, points: &[Point], config: &GeometryConfig) -> GeometryResult<BezPath> {
    check_point_count(kind, points)?;

    let path = match kind {
        ShapeKind::Line => {
            let mut path = BezPath::new();
            path.move_to(points[0]);
            path.line_to(points[1]);
            path
        }
        ShapeKind::Rectangle => {
            let rect = canonical_box(points);
            RoundedRect::from_rect(rect, config.corner_radius).to_path(PATH_ACCURACY)
        }
        ShapeKind::Ellipse => Ellipse::from_rect(canonical_box(points)).to_path(PATH_ACCURACY),
        ShapeKind::Hexagon => hexagon(canonical_box(points)),
        ShapeKind::Triangle => {
            let mut path = BezPath::new();
            path.move_to(points[0]);
            path.line_to(points[1]);
            path.line_to(points[2]);
            path.close_path();
            path
        }
        ShapeKind::Sketch | ShapeKind::Polygon => {
            let path = fit_path(points, config.fit_tolerance, kind == ShapeKind::Polygon);
            if path.elements().is_empty() {
                return Err(GeometryError::InsufficientGeometry {
                    kind,
                    required: kind.required_points(),
                    found: fit::dedup(points).len(),
                });
            }
            path
        }
        ShapeKind::Picture | ShapeKind::Text | ShapeKind::Group => {
            let rect = Rect::from_points(points[0], points[1]);
            rect.to_path(PATH_ACCURACY)
        }
    };
    Ok(path)
}

/// Validate the control point count for `kind`.
pub fn check_point_count(kind: ShapeKind, points: &[Point]) -> GeometryResult<()> {
    let required = kind.required_points();
    let ok = if kind.is_freehand() {
        points.len() >= required
    } else {
        points.len() == required
    };
    if ok {
        Ok(())
    } else {
        Err(GeometryError::InsufficientGeometry {
            kind,
            required,
            found: points.len(),
        })
    }
}

/// Axis-aligned box spanned by four box-fit control points in any winding.
///
/// Points 0 and 2 are tried as the diagonal first, then points 3 and 1. When
/// neither pair spans a box the bounding box of all points is used.
pub fn canonical_box(points: &[Point]) -> Rect {
    let spans = |a: Point, b: Point| (a.x - b.x).abs() > f64::EPSILON && (a.y - b.y).abs() > f64::EPSILON;
    match points {
        [p0, _, p2, ..] if spans(*p0, *p2) => Rect::from_points(*p0, *p2),
        [_, p1, _, p3, ..] if spans(*p3, *p1) => Rect::from_points(*p3, *p1),
        _ => bounding_box(points),
    }
}

/// Bounding box of a point set, `Rect::ZERO` when empty.
pub fn bounding_box(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p))
}

/// Number of on-curve anchor points in a path.
pub fn anchor_count(path: &BezPath) -> usize {
    path.elements()
        .iter()
        .filter(|el| !matches!(el, PathEl::ClosePath))
        .count()
}

fn hexagon(rect: Rect) -> BezPath {
    let w = rect.width();
    let cy = rect.center().y;
    let mut path = BezPath::new();
    path.move_to(Point::new(rect.x0 + w / 4.0, rect.y0));
    path.line_to(Point::new(rect.x0 + 3.0 * w / 4.0, rect.y0));
    path.line_to(Point::new(rect.x1, cy));
    path.line_to(Point::new(rect.x0 + 3.0 * w / 4.0, rect.y1));
    path.line_to(Point::new(rect.x0 + w / 4.0, rect.y1));
    path.line_to(Point::new(rect.x0, cy));
    path.close_path();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ccw() -> Vec<Point> {
        vec![
            Point::new(10.0, 20.0),
            Point::new(10.0, 70.0),
            Point::new(110.0, 70.0),
            Point::new(110.0, 20.0),
        ]
    }

    #[test]
    fn test_collapsed_stroke_has_no_path() {
        let config = GeometryConfig::default();
        let same = [Point::new(5.0, 5.0); 3];
        let err = build_path(ShapeKind::Sketch, &same, &config).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::InsufficientGeometry {
                kind: ShapeKind::Sketch,
                required: 2,
                found: 1,
            }
        ));
        assert!(build_path(ShapeKind::Polygon, &same, &config).is_err());
    }

    #[test]
    fn test_line_path() {
        let path = build_path(
            ShapeKind::Line,
            &[Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            &GeometryConfig::default(),
        )
        .unwrap();
        assert_eq!(anchor_count(&path), 2);
    }

    #[test]
    fn test_rectangle_winding_independent() {
        let config = GeometryConfig::default();
        let forward = ccw();
        let mut reverse = forward.clone();
        reverse.reverse();
        let a = build_path(ShapeKind::Rectangle, &forward, &config).unwrap().bounding_box();
        let b = build_path(ShapeKind::Rectangle, &reverse, &config).unwrap().bounding_box();
        assert!((a.x0 - b.x0).abs() < 1e-9 && (a.y0 - b.y0).abs() < 1e-9);
        assert!((a.x1 - b.x1).abs() < 1e-9 && (a.y1 - b.y1).abs() < 1e-9);
        assert!((a.width() - 100.0).abs() < 1e-9);
        assert!((a.height() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_canonical_box_fallback_pair() {
        // 0 and 2 share an x coordinate, so 3 and 1 must be used.
        let points = [
            Point::new(0.0, 0.0),
            Point::new(40.0, 30.0),
            Point::new(0.0, 30.0),
            Point::new(40.0, 0.0),
        ];
        let rect = canonical_box(&points);
        assert_eq!(rect, Rect::new(0.0, 0.0, 40.0, 30.0));
    }

    #[test]
    fn test_ellipse_and_hexagon_fit_box() {
        let config = GeometryConfig::default();
        let e = build_path(ShapeKind::Ellipse, &ccw(), &config).unwrap().bounding_box();
        assert!((e.width() - 100.0).abs() < 1e-6);
        let h = build_path(ShapeKind::Hexagon, &ccw(), &config).unwrap();
        assert_eq!(anchor_count(&h), 6);
        assert!((h.bounding_box().height() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_triangle_closed() {
        let path = build_path(
            ShapeKind::Triangle,
            &[Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(5.0, 8.0)],
            &GeometryConfig::default(),
        )
        .unwrap();
        assert!(matches!(path.elements().last(), Some(PathEl::ClosePath)));
    }

    #[test]
    fn test_insufficient_points() {
        let config = GeometryConfig::default();
        let err = build_path(ShapeKind::Rectangle, &ccw()[..3], &config).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::InsufficientGeometry { required: 4, found: 3, .. }
        ));
        assert!(build_path(ShapeKind::Triangle, &ccw(), &config).is_err());
        assert!(build_path(ShapeKind::Sketch, &[Point::ZERO], &config).is_err());
    }
}
