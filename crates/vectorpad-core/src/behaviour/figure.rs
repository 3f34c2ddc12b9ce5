//! Plain primitives and freehand shapes: corner resize and move.

use super::unsupported;
use crate::config::GeometryConfig;
use crate::error::GeometryResult;
use crate::hit::{contains, handle_at};
use crate::permutation::contains_rotator;
use crate::shapes::{Figure, Shape, ShapeTrait, Sketch};
use crate::widget::{Corner, HandleKind};
use kurbo::{Point, Vec2};

/// Shapes resized by moving the two anchors of their frame.
pub(super) trait Framed: ShapeTrait {
    fn frame_start(&self) -> Point;
    fn frame_end(&self) -> Point;
    fn reframe(&mut self, start: Point, end: Point);
}

impl Framed for Figure {
    fn frame_start(&self) -> Point {
        self.start()
    }

    fn frame_end(&self) -> Point {
        self.end()
    }

    fn reframe(&mut self, start: Point, end: Point) {
        self.set_frame(start, end);
    }
}

impl Framed for Sketch {
    fn frame_start(&self) -> Point {
        self.start()
    }

    fn frame_end(&self) -> Point {
        self.end()
    }

    fn reframe(&mut self, start: Point, end: Point) {
        self.set_frame(start, end);
    }
}

pub(super) fn select_handle(shape: &Shape, pointer: Point, config: &GeometryConfig) -> Option<HandleKind> {
    if let Some(corner) = handle_at(shape, pointer, config) {
        return Some(HandleKind::Corner(corner));
    }
    contains(shape, pointer, config).then_some(HandleKind::Body)
}

pub(super) fn alter<T: Framed>(
    shape: &mut T,
    handle: HandleKind,
    delta: Vec2,
    config: &GeometryConfig,
) -> GeometryResult<()> {
    match handle {
        HandleKind::Corner(corner) => {
            resize(shape, corner, delta, config);
            Ok(())
        }
        HandleKind::Body => {
            shape.translate(delta);
            Ok(())
        }
        HandleKind::Endpoint(_) => Err(unsupported(shape.kind(), handle)),
    }
}

/// Corner rule applied with the raw pointer delta after permuting the grabbed
/// corner by the shape's angle.
fn resize<T: Framed>(shape: &mut T, corner: Corner, delta: Vec2, config: &GeometryConfig) {
    let rotated = contains_rotator(corner, shape.angle());
    let (start, end) = (shape.frame_start(), shape.frame_end());
    let (mut new_start, mut new_end) = (start, end);
    match rotated {
        Corner::TopLeft => new_start += delta,
        Corner::BottomLeft => {
            new_start.x += delta.x;
            new_end.y += delta.y;
        }
        Corner::TopRight => {
            new_start.y += delta.y;
            new_end.x += delta.x;
        }
        Corner::BottomRight => new_end += delta,
    }

    // Size floor, per axis.
    if (new_end.x - new_start.x).abs() < config.min_shape_size {
        new_start.x = start.x;
        new_end.x = end.x;
    }
    if (new_end.y - new_start.y).abs() < config.min_shape_size {
        new_start.y = start.y;
        new_end.y = end.y;
    }

    shape.reframe(new_start, new_end);
    shape.rebuild_path(config);
    log::trace!(
        "{:?} {} resized at {corner:?} (as {rotated:?}) to {new_start:?}..{new_end:?}",
        shape.kind(),
        shape.id()
    );
}
