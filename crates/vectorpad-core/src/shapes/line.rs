//! Line shape.

use super::{ShapeId, ShapeKind, ShapeStyle, ShapeTrait, path_centre, rect_corners, store_angle};
use crate::config::GeometryConfig;
use crate::error::GeometryResult;
use crate::path::build_path;
use crate::widget::WidgetState;
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight two-point line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ShapeId,
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Rotation angle in radians (around the rotation centre).
    #[serde(default)]
    angle: f64,
    /// Style properties.
    pub style: ShapeStyle,
    #[serde(skip)]
    state: WidgetState,
    #[serde(skip)]
    path: Option<BezPath>,
}

impl Line {
    /// Create a new line.
    pub fn new(start: Point, end: Point) -> Self {
        let mut line = Self {
            id: Uuid::new_v4(),
            start,
            end,
            angle: 0.0,
            style: ShapeStyle::default(),
            state: WidgetState::default(),
            path: None,
        };
        line.rebuild_path(&GeometryConfig::default());
        line
    }

    /// Get the length of the line.
    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    /// Get the midpoint of the line.
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// Move one endpoint (0 = start, anything else = end).
    pub fn move_endpoint(&mut self, index: usize, delta: Vec2) {
        if index == 0 {
            self.start += delta;
        } else {
            self.end += delta;
        }
    }
}

impl ShapeTrait for Line {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Line
    }

    fn angle(&self) -> f64 {
        self.angle
    }

    fn set_angle(&mut self, angle: f64) {
        store_angle(&mut self.angle, angle);
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn control_points(&self) -> Vec<Point> {
        vec![self.start, self.end]
    }

    fn anchors(&self) -> (Point, Point) {
        (self.start, self.end)
    }

    fn local_corners(&self) -> [Point; 4] {
        rect_corners(Rect::from_points(self.start, self.end))
    }

    fn rotation_centre(&self) -> Point {
        path_centre(self.path.as_ref(), &[self.start, self.end], self.anchors())
    }

    fn build_path(&self, config: &GeometryConfig) -> GeometryResult<BezPath> {
        build_path(ShapeKind::Line, &[self.start, self.end], config)
    }

    fn path(&self) -> Option<&BezPath> {
        self.path.as_ref()
    }

    fn rebuild_path(&mut self, config: &GeometryConfig) {
        self.path = self.build_path(config).ok();
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
        self.path = self.path.take().map(|p| kurbo::Affine::translate(delta) * p);
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
