//! Freehand strokes and outlines.

use super::{
    ShapeId, ShapeKind, ShapeStyle, ShapeTrait, path_centre, rect_corners, remap_points, store_angle,
};
use crate::config::GeometryConfig;
use crate::error::GeometryResult;
use crate::path::{bounding_box, build_path};
use crate::widget::WidgetState;
use kurbo::{Affine, BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand drawing (series of raw pointer samples).
///
/// The samples are kept as captured; the rendered path is a fitted curve
/// through them. A closed sketch is a freehand polygon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sketch {
    pub(crate) id: ShapeId,
    /// Points in the freehand path.
    pub points: Vec<Point>,
    /// Close the fitted path.
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    angle: f64,
    pub style: ShapeStyle,
    #[serde(skip)]
    state: WidgetState,
    #[serde(skip)]
    path: Option<BezPath>,
}

impl Sketch {
    /// Create a new empty open sketch.
    pub fn new() -> Self {
        Self::from_points(Vec::new(), false)
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>, closed: bool) -> Self {
        let mut sketch = Self {
            id: Uuid::new_v4(),
            points,
            closed,
            angle: 0.0,
            style: ShapeStyle::default(),
            state: WidgetState::default(),
            path: None,
        };
        sketch.rebuild_path(&GeometryConfig::default());
        sketch
    }

    /// Add a sample to the stroke. The path is refitted on the next rebuild.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> Point {
        let b = bounding_box(&self.points);
        Point::new(b.x0, b.y0)
    }

    pub fn end(&self) -> Point {
        let b = bounding_box(&self.points);
        Point::new(b.x1, b.y1)
    }

    /// Stretch the samples onto the frame `start`..`end`.
    pub fn set_frame(&mut self, start: Point, end: Point) {
        let from = (self.start(), self.end());
        remap_points(&mut self.points, from, (start, end));
    }
}

impl Default for Sketch {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeTrait for Sketch {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        if self.closed {
            ShapeKind::Polygon
        } else {
            ShapeKind::Sketch
        }
    }

    fn angle(&self) -> f64 {
        self.angle
    }

    fn set_angle(&mut self, angle: f64) {
        store_angle(&mut self.angle, angle);
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn control_points(&self) -> Vec<Point> {
        self.points.clone()
    }

    fn anchors(&self) -> (Point, Point) {
        (self.start(), self.end())
    }

    fn local_corners(&self) -> [Point; 4] {
        rect_corners(bounding_box(&self.points))
    }

    fn rotation_centre(&self) -> Point {
        path_centre(self.path.as_ref(), &self.points, self.anchors())
    }

    fn build_path(&self, config: &GeometryConfig) -> GeometryResult<BezPath> {
        build_path(self.kind(), &self.points, config)
    }

    fn path(&self) -> Option<&BezPath> {
        self.path.as_ref()
    }

    fn rebuild_path(&mut self, config: &GeometryConfig) {
        self.path = match self.build_path(config) {
            Ok(path) => Some(path),
            Err(err) => {
                // Normal while a stroke is still being drawn.
                log::trace!("sketch {} not drawable yet: {err}", self.id);
                None
            }
        };
    }

    fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
        self.path = self.path.take().map(|p| Affine::translate(delta) * p);
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn widget_state(&self) -> &WidgetState {
        &self.state
    }

    fn set_widget_state(&mut self, state: WidgetState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::anchor_count;
    use kurbo::{ParamCurveNearest, PathEl};

    #[test]
    fn test_sketch_creation() {
        let mut sketch = Sketch::new();
        assert!(sketch.is_empty());
        sketch.add_point(Point::new(0.0, 0.0));
        assert_eq!(sketch.len(), 1);
        sketch.rebuild_path(&GeometryConfig::default());
        assert!(sketch.path().is_none());
    }

    #[test]
    fn test_collapsed_stroke_bounds_stay_put() {
        let sketch = Sketch::from_points(vec![Point::new(40.0, 30.0); 4], false);
        assert!(sketch.path().is_none());
        let b = sketch.bounds();
        assert!((b.x0 - 40.0).abs() < 1e-9 && (b.y0 - 30.0).abs() < 1e-9);
        assert!(b.width().abs() < 1e-9 && b.height().abs() < 1e-9);
    }

    #[test]
    fn test_collinear_samples_fit_fewer_anchors() {
        let points: Vec<Point> = (0..5).map(|i| Point::new(i as f64 * 10.0, 0.0)).collect();
        let sketch = Sketch::from_points(points.clone(), false);
        let path = sketch.path().unwrap();
        assert!(anchor_count(path) < 5);
        for p in &points {
            let d = path
                .segments()
                .map(|seg| seg.nearest(*p, 1e-6).distance_sq.sqrt())
                .fold(f64::INFINITY, f64::min);
            assert!(d <= 0.75);
        }
    }

    #[test]
    fn test_closed_sketch_is_polygon() {
        let sketch = Sketch::from_points(
            vec![
                Point::new(0.0, 0.0),
                Point::new(20.0, 0.0),
                Point::new(20.0, 20.0),
                Point::new(0.0, 20.0),
            ],
            true,
        );
        assert_eq!(sketch.kind(), ShapeKind::Polygon);
        assert!(matches!(sketch.path().unwrap().elements().last(), Some(PathEl::ClosePath)));
    }

    #[test]
    fn test_set_frame_stretches_samples() {
        let mut sketch = Sketch::from_points(vec![Point::new(0.0, 0.0), Point::new(10.0, 5.0), Point::new(20.0, 10.0)], false);
        sketch.set_frame(Point::new(0.0, 0.0), Point::new(40.0, 10.0));
        assert_eq!(sketch.points[1], Point::new(20.0, 5.0));
        assert_eq!(sketch.end(), Point::new(40.0, 10.0));
    }
}
