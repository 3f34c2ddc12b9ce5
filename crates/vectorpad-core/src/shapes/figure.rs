//! Closed primitive figures: rectangle, ellipse, triangle and hexagon.

use super::{
    ShapeId, ShapeKind, ShapeStyle, ShapeTrait, path_centre, rect_corners, remap_points, store_angle,
};
use crate::config::GeometryConfig;
use crate::error::GeometryResult;
use crate::path::{bounding_box, build_path, canonical_box, check_point_count};
use crate::widget::WidgetState;
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which primitive a [`Figure`] draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FigureKind {
    Rectangle,
    Ellipse,
    Triangle,
    Hexagon,
}

impl FigureKind {
    pub fn shape_kind(self) -> ShapeKind {
        match self {
            FigureKind::Rectangle => ShapeKind::Rectangle,
            FigureKind::Ellipse => ShapeKind::Ellipse,
            FigureKind::Triangle => ShapeKind::Triangle,
            FigureKind::Hexagon => ShapeKind::Hexagon,
        }
    }
}

/// A closed primitive defined by its control points.
///
/// Box-fit kinds keep four points (any winding), triangles three.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub(crate) id: ShapeId,
    pub kind: FigureKind,
    points: Vec<Point>,
    #[serde(default)]
    angle: f64,
    pub style: ShapeStyle,
    #[serde(skip)]
    state: WidgetState,
    #[serde(skip)]
    path: Option<BezPath>,
}

impl Figure {
    fn with_points(kind: FigureKind, points: Vec<Point>) -> Self {
        let mut figure = Self {
            id: Uuid::new_v4(),
            kind,
            points,
            angle: 0.0,
            style: ShapeStyle::default(),
            state: WidgetState::default(),
            path: None,
        };
        figure.rebuild_path(&GeometryConfig::default());
        figure
    }

    /// Rounded rectangle spanning `start`..`end`.
    pub fn rectangle(start: Point, end: Point) -> Self {
        Self::with_points(FigureKind::Rectangle, box_points(start, end))
    }

    /// Ellipse inscribed in `start`..`end`.
    pub fn ellipse(start: Point, end: Point) -> Self {
        Self::with_points(FigureKind::Ellipse, box_points(start, end))
    }

    /// Hexagon inscribed in `start`..`end`.
    pub fn hexagon(start: Point, end: Point) -> Self {
        Self::with_points(FigureKind::Hexagon, box_points(start, end))
    }

    pub fn triangle(a: Point, b: Point, c: Point) -> Self {
        Self::with_points(FigureKind::Triangle, vec![a, b, c])
    }

    /// Build from raw control points, rejecting a count the kind cannot use.
    pub fn from_control_points(kind: FigureKind, points: Vec<Point>) -> GeometryResult<Self> {
        check_point_count(kind.shape_kind(), &points)?;
        Ok(Self::with_points(kind, points))
    }

    /// Axis-aligned frame of the control points.
    pub fn frame(&self) -> Rect {
        match self.kind {
            FigureKind::Triangle => bounding_box(&self.points),
            _ => canonical_box(&self.points),
        }
    }

    /// Top-left of the frame.
    pub fn start(&self) -> Point {
        let f = self.frame();
        Point::new(f.x0, f.y0)
    }

    /// Bottom-right of the frame.
    pub fn end(&self) -> Point {
        let f = self.frame();
        Point::new(f.x1, f.y1)
    }

    /// Move the frame to `start`..`end`, carrying every control point along.
    ///
    /// The cached path is left stale; callers rebuild it once the edit is done.
    pub fn set_frame(&mut self, start: Point, end: Point) {
        let from = (self.start(), self.end());
        remap_points(&mut self.points, from, (start, end));
    }
}

/// Four box points in top-left, bottom-left, bottom-right, top-right order.
fn box_points(start: Point, end: Point) -> Vec<Point> {
    vec![
        start,
        Point::new(start.x, end.y),
        end,
        Point::new(end.x, start.y),
    ]
}

impl ShapeTrait for Figure {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        self.kind.shape_kind()
    }

    fn angle(&self) -> f64 {
        self.angle
    }

    fn set_angle(&mut self, angle: f64) {
        store_angle(&mut self.angle, angle);
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn control_points(&self) -> Vec<Point> {
        self.points.clone()
    }

    fn anchors(&self) -> (Point, Point) {
        (self.start(), self.end())
    }

    fn local_corners(&self) -> [Point; 4] {
        rect_corners(self.frame())
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
                log::warn!("figure {} has no path: {err}", self.id);
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
