//! Group shape for combining multiple shapes.

use super::{Shape, ShapeId, ShapeKind, ShapeStyle, ShapeTrait, rect_corners, store_angle};
use crate::config::GeometryConfig;
use crate::error::GeometryResult;
use crate::path::{bounding_box, build_path};
use crate::vector::rotate_about;
use crate::widget::WidgetState;
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A group of shapes that can be manipulated as a single unit.
/// Groups can contain other groups, enabling nested hierarchies.
///
/// `start`/`end` are derived from the children and must be refreshed with
/// [`Group::refresh_bounds`] after any child changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub(crate) id: ShapeId,
    /// Child shapes in this group.
    children: Vec<Shape>,
    #[serde(default)]
    angle: f64,
    /// Style properties (not drawn, kept for consistency).
    style: ShapeStyle,
    #[serde(skip)]
    start: Point,
    #[serde(skip)]
    end: Point,
    #[serde(skip)]
    state: WidgetState,
    #[serde(skip)]
    path: Option<BezPath>,
}

impl Group {
    /// Create a new group from a list of shapes.
    pub fn new(children: Vec<Shape>) -> Self {
        let mut group = Self {
            id: Uuid::new_v4(),
            children,
            angle: 0.0,
            style: ShapeStyle::default(),
            start: Point::ZERO,
            end: Point::ZERO,
            state: WidgetState::default(),
            path: None,
        };
        group.refresh_bounds(&GeometryConfig::default());
        group
    }

    pub fn children(&self) -> &[Shape] {
        &self.children
    }

    /// Mutable access to the children. Call [`Group::refresh_bounds`] afterwards.
    pub fn children_mut(&mut self) -> &mut Vec<Shape> {
        &mut self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Recompute `start`/`end` from the children's rotated corners and rebuild
    /// the frame path. Nested groups are refreshed first.
    pub fn refresh_bounds(&mut self, config: &GeometryConfig) {
        let mut corners = Vec::with_capacity(self.children.len() * 4);
        for child in &mut self.children {
            if let Shape::Group(inner) = child {
                inner.refresh_bounds(config);
            }
            corners.extend(child.screen_corners());
        }
        let b = bounding_box(&corners);
        self.start = Point::new(b.x0, b.y0);
        self.end = Point::new(b.x1, b.y1);
        self.rebuild_path(config);
    }

    /// Dissolve this group and return its children.
    ///
    /// The group's own rotation is folded into each child so nothing moves on
    /// screen.
    pub fn ungroup(self) -> Vec<Shape> {
        let angle = self.angle;
        let pivot = self.start.midpoint(self.end);
        let mut children = self.children;
        if angle != 0.0 {
            for child in &mut children {
                let centre = child.rotation_centre();
                child.translate(rotate_about(centre, pivot, angle) - centre);
                let turned = child.angle() + angle;
                child.set_angle(turned);
            }
        }
        children
    }

    /// Get all shape IDs in this group (including nested groups).
    pub fn all_shape_ids(&self) -> Vec<ShapeId> {
        let mut ids = vec![self.id];
        for child in &self.children {
            if let Shape::Group(group) = child {
                ids.extend(group.all_shape_ids());
            } else {
                ids.push(child.id());
            }
        }
        ids
    }

    /// Find a shape by ID within this group (including nested groups).
    pub fn find(&self, id: ShapeId) -> Option<&Shape> {
        for child in &self.children {
            if child.id() == id {
                return Some(child);
            }
            if let Shape::Group(group) = child {
                if let Some(found) = group.find(id) {
                    return Some(found);
                }
            }
        }
        None
    }
}

impl ShapeTrait for Group {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Group
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
        vec![self.start, self.end]
    }

    fn anchors(&self) -> (Point, Point) {
        (self.start, self.end)
    }

    fn local_corners(&self) -> [Point; 4] {
        rect_corners(Rect::from_points(self.start, self.end))
    }

    fn rotation_centre(&self) -> Point {
        self.start.midpoint(self.end)
    }

    fn build_path(&self, config: &GeometryConfig) -> GeometryResult<BezPath> {
        build_path(ShapeKind::Group, &self.control_points(), config)
    }

    fn path(&self) -> Option<&BezPath> {
        self.path.as_ref()
    }

    fn rebuild_path(&mut self, config: &GeometryConfig) {
        self.path = self.build_path(config).ok();
    }

    fn translate(&mut self, delta: Vec2) {
        for child in &mut self.children {
            child.translate(delta);
        }
        self.start += delta;
        self.end += delta;
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
    use crate::shapes::{Figure, Line};
    use std::f64::consts::FRAC_PI_2;

    fn two_rects() -> Group {
        Group::new(vec![
            Figure::rectangle(Point::new(0.0, 0.0), Point::new(100.0, 50.0)).into(),
            Figure::rectangle(Point::new(200.0, 200.0), Point::new(250.0, 300.0)).into(),
        ])
    }

    #[test]
    fn test_group_bounds() {
        let group = two_rects();
        assert_eq!(group.len(), 2);
        assert!((group.start() - Point::new(0.0, 0.0)).hypot() < 1e-9);
        assert!((group.end() - Point::new(250.0, 300.0)).hypot() < 1e-9);
        assert!((group.rotation_centre() - Point::new(125.0, 150.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_translate_moves_children() {
        let mut group = two_rects();
        group.translate(Vec2::new(10.0, -10.0));
        assert!((group.start() - Point::new(10.0, -10.0)).hypot() < 1e-9);
        let first = group.children()[0].screen_corners()[0];
        assert!((first - Point::new(10.0, -10.0)).hypot() < 1e-9);
        group.refresh_bounds(&GeometryConfig::default());
        assert!((group.end() - Point::new(260.0, 290.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_nested_find() {
        let line = Line::new(Point::ZERO, Point::new(5.0, 5.0));
        let line_id = line.id();
        let inner = Group::new(vec![line.into()]);
        let inner_id = inner.id();
        let outer = Group::new(vec![inner.into(), Figure::ellipse(Point::ZERO, Point::new(8.0, 8.0)).into()]);
        assert!(outer.find(line_id).is_some());
        assert!(outer.find(inner_id).is_some());
        assert_eq!(outer.all_shape_ids().len(), 4);
    }

    #[test]
    fn test_ungroup_keeps_screen_position() {
        let mut group = Group::new(vec![
            Figure::rectangle(Point::new(0.0, 0.0), Point::new(10.0, 10.0)).into(),
            Figure::rectangle(Point::new(30.0, 0.0), Point::new(40.0, 10.0)).into(),
        ]);
        group.set_angle(FRAC_PI_2);
        let t = group.transform();
        let before = t * Point::new(35.0, 5.0);
        let children = group.ungroup();
        let after = children[1].rotation_centre();
        assert!((before - after).hypot() < 1e-9);
        assert!((children[1].angle() - FRAC_PI_2).abs() < 1e-12);
    }
}
