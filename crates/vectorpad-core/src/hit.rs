//! Hit-testing and handle geometry.
//!
//! All inputs are screen-space points. Thin shapes are hit along their rendered
//! path; closed shapes over their area, tested in the shape's untransformed
//! frame.

use crate::config::GeometryConfig;
use crate::path::bounding_box;
use crate::shapes::Shape;
use crate::widget::{Corner, CornerHandle};
use kurbo::{BezPath, ParamCurveNearest, Point, Rect, Shape as KurboShape};

/// Nearest-point accuracy for path distance queries.
const NEAREST_ACCURACY: f64 = 1e-6;

/// The four rotated corner handles of a shape, in [`Corner::ALL`] order.
pub fn corner_handles(shape: &Shape, config: &GeometryConfig) -> [CornerHandle; 4] {
    let corners = shape.screen_corners();
    Corner::ALL.map(|corner| CornerHandle::new(corner, corners[corner.index()], config.hotzone_size))
}

/// Rotated handle for one logical corner.
pub fn corner_handle(shape: &Shape, corner: Corner, config: &GeometryConfig) -> CornerHandle {
    CornerHandle::new(corner, shape.screen_corners()[corner.index()], config.hotzone_size)
}

/// First logical corner whose hotzone contains `pointer`, in priority order.
pub fn handle_at(shape: &Shape, pointer: Point, config: &GeometryConfig) -> Option<Corner> {
    corner_handles(shape, config)
        .into_iter()
        .find(|h| h.hit_test(pointer))
        .map(|h| h.corner)
}

/// Shortest distance from `point` to any segment of `path`.
pub fn distance_to_path(path: &BezPath, point: Point) -> f64 {
    path.segments()
        .map(|seg| seg.nearest(point, NEAREST_ACCURACY).distance_sq)
        .fold(f64::INFINITY, f64::min)
        .sqrt()
}

/// Whether a screen point lies on or in `shape`.
pub fn contains(shape: &Shape, point: Point, config: &GeometryConfig) -> bool {
    let kind = shape.kind();
    if kind.is_thin() {
        let band = config.hit_tolerance + shape.style().stroke_width / 2.0;
        return shape
            .screen_path()
            .is_some_and(|path| distance_to_path(&path, point) <= band);
    }

    let local = shape.transform().inverse() * point;
    match shape {
        Shape::Figure(_) | Shape::Sketch(_) => match shape.path() {
            Some(path) => {
                path.contains(local) || distance_to_path(path, local) <= config.hit_tolerance
            }
            None => false,
        },
        Shape::Group(group) => {
            // Hit if any child is hit, tested in the group's frame.
            group.children().iter().any(|child| contains(child, local, config))
        }
        _ => frame(shape).contains(local),
    }
}

/// Untransformed frame of a box-like shape.
fn frame(shape: &Shape) -> Rect {
    bounding_box(&shape.as_dyn().local_corners())
}
