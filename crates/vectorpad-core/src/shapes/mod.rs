//! Shape definitions for the drawing surface.
//!
//! Every shape stores its untransformed geometry plus a rotation angle that is
//! applied about a computed rotation centre. The renderable path is cached on
//! the shape and rebuilt whenever the geometry changes; the angle is never
//! baked into it.

mod figure;
mod freehand;
mod group;
mod line;
mod picture;
mod text;

pub use figure::{Figure, FigureKind};
pub use freehand::Sketch;
pub use group::Group;
pub use line::Line;
pub use picture::{ImageFormat, Picture};
pub use text::{ApproximateLayout, Text, TextLayout, TextSelection};

use crate::config::GeometryConfig;
use crate::error::GeometryResult;
use crate::path::bounding_box;
use crate::vector::normalize_angle;
use crate::widget::WidgetState;
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// The concrete kind of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Line,
    Rectangle,
    Ellipse,
    Triangle,
    Hexagon,
    /// Open freehand stroke.
    Sketch,
    /// Closed freehand outline.
    Polygon,
    Picture,
    Text,
    Group,
}

impl ShapeKind {
    /// Control points the kind needs (a minimum for freehand kinds).
    pub fn required_points(self) -> usize {
        match self {
            ShapeKind::Rectangle | ShapeKind::Ellipse | ShapeKind::Hexagon => 4,
            ShapeKind::Triangle => 3,
            ShapeKind::Line
            | ShapeKind::Sketch
            | ShapeKind::Polygon
            | ShapeKind::Picture
            | ShapeKind::Text
            | ShapeKind::Group => 2,
        }
    }

    pub fn is_freehand(self) -> bool {
        matches!(self, ShapeKind::Sketch | ShapeKind::Polygon)
    }

    /// Closed primitive figure (box-fit or triangle).
    pub fn is_figure(self) -> bool {
        matches!(
            self,
            ShapeKind::Rectangle | ShapeKind::Ellipse | ShapeKind::Triangle | ShapeKind::Hexagon
        )
    }

    /// Whether paths of this kind are closed when first built.
    pub fn closed_by_default(self) -> bool {
        !matches!(self, ShapeKind::Line | ShapeKind::Sketch)
    }

    /// Thin shapes are hit along their path rather than over their area.
    pub fn is_thin(self) -> bool {
        matches!(self, ShapeKind::Line | ShapeKind::Sketch)
    }
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties read from the canvas-wide style state.
///
/// The geometry core only reads these; stroke width widens the hit band of
/// thin shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
}

fn default_font_size() -> f64 {
    20.0
}

impl ShapeStyle {
    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }

    pub fn set_stroke(&mut self, color: Color) {
        self.stroke_color = color.into();
    }

    pub fn set_fill(&mut self, color: Option<Color>) {
        self.fill_color = color.map(|c| c.into());
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            fill_color: None,
            font_size: default_font_size(),
        }
    }
}

/// Common contract of all shape kinds.
pub trait ShapeTrait {
    fn id(&self) -> ShapeId;

    fn kind(&self) -> ShapeKind;

    /// Rotation in radians, within `(-PI, PI]`.
    fn angle(&self) -> f64;

    /// Store a new angle. Implementations must normalise through [`normalize_angle`].
    fn set_angle(&mut self, angle: f64);

    /// Legacy flag adding a fixed `-PI/2` to the rendered rotation.
    fn is_vertical(&self) -> bool {
        false
    }

    /// Whether the materialised path is closed.
    fn is_closed(&self) -> bool;

    /// Untransformed control points.
    fn control_points(&self) -> Vec<Point>;

    /// Untransformed `start`/`end` anchors used for the degenerate centre fallback.
    fn anchors(&self) -> (Point, Point);

    /// Untransformed corners in `[top-left, bottom-left, bottom-right, top-right]` order.
    fn local_corners(&self) -> [Point; 4];

    /// Pivot the angle is applied about.
    fn rotation_centre(&self) -> Point;

    /// Build the path from the current geometry.
    fn build_path(&self, config: &GeometryConfig) -> GeometryResult<BezPath>;

    /// Cached path, `None` until a successful build.
    fn path(&self) -> Option<&BezPath>;

    /// Rebuild the cached path. A failed build clears the cache.
    fn rebuild_path(&mut self, config: &GeometryConfig);

    /// Move the untransformed geometry by `delta`.
    fn translate(&mut self, delta: Vec2);

    fn style(&self) -> &ShapeStyle;

    fn style_mut(&mut self) -> &mut ShapeStyle;

    fn widget_state(&self) -> &WidgetState;

    fn set_widget_state(&mut self, state: WidgetState);

    /// Angle actually rendered, including the legacy vertical correction.
    fn effective_angle(&self) -> f64 {
        if self.is_vertical() {
            self.angle() - FRAC_PI_2
        } else {
            self.angle()
        }
    }

    /// Untransformed to screen space: translate to the centre, rotate, translate back.
    fn transform(&self) -> Affine {
        let centre = self.rotation_centre().to_vec2();
        Affine::translate(centre) * Affine::rotate(self.effective_angle()) * Affine::translate(-centre)
    }

    /// Corners mapped through [`ShapeTrait::transform`].
    fn screen_corners(&self) -> [Point; 4] {
        let t = self.transform();
        self.local_corners().map(|p| t * p)
    }

    /// Axis-aligned bounds of the rotated shape.
    fn bounds(&self) -> Rect {
        match self.path() {
            Some(path) if self.kind().is_thin() || self.kind().is_figure() => {
                (self.transform() * path.clone()).bounding_box()
            }
            _ => bounding_box(&self.screen_corners()),
        }
    }
}

/// Rotation centre shared by the control-point kinds.
///
/// Uses the centre of the path's bounding box, falling back to the midpoint of
/// the start/end anchors for shapes thinner than the degenerate extent.
pub(crate) fn path_centre(path: Option<&BezPath>, points: &[Point], anchors: (Point, Point)) -> Point {
    let bbox = path
        .map(|p| p.bounding_box())
        .unwrap_or_else(|| bounding_box(points));
    if bbox.width() < crate::config::DEGENERATE_EXTENT || bbox.height() < crate::config::DEGENERATE_EXTENT {
        anchors.0.midpoint(anchors.1)
    } else {
        bbox.center()
    }
}

/// Corners of an axis-aligned box in handle order.
pub(crate) fn rect_corners(rect: Rect) -> [Point; 4] {
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x0, rect.y1),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x1, rect.y0),
    ]
}

/// Map points from the box spanned by `from` onto the box spanned by `to`.
///
/// Each axis is scaled independently with signs kept, so dragging one anchor
/// past the other mirrors the points. An axis with no extent in `from` is
/// translated instead of scaled.
pub(crate) fn remap_points(points: &mut [Point], from: (Point, Point), to: (Point, Point)) {
    let axis = |v: f64, a0: f64, a1: f64, b0: f64, b1: f64| {
        let span = a1 - a0;
        if span.abs() < f64::EPSILON {
            v + (b0 - a0)
        } else {
            b0 + (v - a0) * (b1 - b0) / span
        }
    };
    for p in points.iter_mut() {
        *p = Point::new(
            axis(p.x, from.0.x, from.1.x, to.0.x, to.1.x),
            axis(p.y, from.0.y, from.1.y, to.0.y, to.1.y),
        );
    }
}

/// Closed set of shape kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Line(Line),
    Figure(Figure),
    Sketch(Sketch),
    Picture(Picture),
    Text(Text),
    Group(Group),
}

impl Shape {
    pub fn as_dyn(&self) -> &dyn ShapeTrait {
        match self {
            Shape::Line(s) => s,
            Shape::Figure(s) => s,
            Shape::Sketch(s) => s,
            Shape::Picture(s) => s,
            Shape::Text(s) => s,
            Shape::Group(s) => s,
        }
    }

    pub fn as_dyn_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            Shape::Line(s) => s,
            Shape::Figure(s) => s,
            Shape::Sketch(s) => s,
            Shape::Picture(s) => s,
            Shape::Text(s) => s,
            Shape::Group(s) => s,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.as_dyn().id()
    }

    pub fn kind(&self) -> ShapeKind {
        self.as_dyn().kind()
    }

    pub fn angle(&self) -> f64 {
        self.as_dyn().angle()
    }

    pub fn set_angle(&mut self, angle: f64) {
        self.as_dyn_mut().set_angle(angle);
    }

    pub fn rotation_centre(&self) -> Point {
        self.as_dyn().rotation_centre()
    }

    pub fn transform(&self) -> Affine {
        self.as_dyn().transform()
    }

    pub fn screen_corners(&self) -> [Point; 4] {
        self.as_dyn().screen_corners()
    }

    pub fn bounds(&self) -> Rect {
        self.as_dyn().bounds()
    }

    pub fn build_path(&self, config: &GeometryConfig) -> GeometryResult<BezPath> {
        self.as_dyn().build_path(config)
    }

    pub fn path(&self) -> Option<&BezPath> {
        self.as_dyn().path()
    }

    pub fn rebuild_path(&mut self, config: &GeometryConfig) {
        self.as_dyn_mut().rebuild_path(config);
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.as_dyn_mut().translate(delta);
    }

    pub fn widget_state(&self) -> &WidgetState {
        self.as_dyn().widget_state()
    }

    pub fn set_widget_state(&mut self, state: WidgetState) {
        self.as_dyn_mut().set_widget_state(state);
    }

    pub fn style(&self) -> &ShapeStyle {
        self.as_dyn().style()
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        self.as_dyn_mut().style_mut()
    }

    /// Rendered path in screen space, `None` while the geometry is incomplete.
    pub fn screen_path(&self) -> Option<BezPath> {
        self.path().map(|p| self.transform() * p.clone())
    }

    /// Regenerate the shape's ID (used when duplicating).
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Shape::Line(s) => s.id = new_id,
            Shape::Figure(s) => s.id = new_id,
            Shape::Sketch(s) => s.id = new_id,
            Shape::Picture(s) => s.id = new_id,
            Shape::Text(s) => s.id = new_id,
            Shape::Group(s) => s.id = new_id,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Shape::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Shape::Group(g) => Some(g),
            _ => None,
        }
    }
}

impl From<Line> for Shape {
    fn from(s: Line) -> Self {
        Shape::Line(s)
    }
}

impl From<Figure> for Shape {
    fn from(s: Figure) -> Self {
        Shape::Figure(s)
    }
}

impl From<Sketch> for Shape {
    fn from(s: Sketch) -> Self {
        Shape::Sketch(s)
    }
}

impl From<Picture> for Shape {
    fn from(s: Picture) -> Self {
        Shape::Picture(s)
    }
}

impl From<Text> for Shape {
    fn from(s: Text) -> Self {
        Shape::Text(s)
    }
}

impl From<Group> for Shape {
    fn from(s: Group) -> Self {
        Shape::Group(s)
    }
}

/// Normalised angle setter shared by the shape impls.
pub(crate) fn store_angle(slot: &mut f64, angle: f64) {
    *slot = normalize_angle(angle);
}
