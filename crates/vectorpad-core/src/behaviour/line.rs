//! Line: drag an endpoint or the whole line.

use super::unsupported;
use crate::config::GeometryConfig;
use crate::error::GeometryResult;
use crate::hit::contains;
use crate::shapes::{Line, Shape, ShapeKind, ShapeTrait};
use crate::vector::rotate_about;
use crate::widget::HandleKind;
use kurbo::{Point, Vec2};

pub(super) fn select_handle(shape: &Shape, pointer: Point, config: &GeometryConfig) -> Option<HandleKind> {
    let Shape::Line(line) = shape else {
        return None;
    };
    let (start, end) = screen_endpoints(line);
    if (pointer - start).hypot() <= config.endpoint_grab_radius {
        Some(HandleKind::Endpoint(0))
    } else if (pointer - end).hypot() <= config.endpoint_grab_radius {
        Some(HandleKind::Endpoint(1))
    } else if contains(shape, pointer, config) {
        Some(HandleKind::Body)
    } else {
        None
    }
}

pub(super) fn alter(line: &mut Line, handle: HandleKind, delta: Vec2, config: &GeometryConfig) -> GeometryResult<()> {
    match handle {
        HandleKind::Endpoint(index) => {
            let (mut start, mut end) = screen_endpoints(line);
            if index == 0 {
                start += delta;
            } else {
                end += delta;
            }
            aim(line, start, end);
            line.rebuild_path(config);
            log::trace!("line {} endpoint {index} moved to {start:?}..{end:?}", line.id());
            Ok(())
        }
        HandleKind::Body => {
            line.translate(delta);
            Ok(())
        }
        HandleKind::Corner(_) => Err(unsupported(ShapeKind::Line, handle)),
    }
}

fn screen_endpoints(line: &Line) -> (Point, Point) {
    let t = line.transform();
    (t * line.start, t * line.end)
}

/// Place the untransformed endpoints so the rotated line runs from `start`
/// to `end` on screen while keeping its angle.
///
/// A line rotates about its midpoint, which the rotation leaves fixed, so the
/// screen midpoint is also the untransformed one.
fn aim(line: &mut Line, start: Point, end: Point) {
    let mid = start.midpoint(end);
    let angle = line.effective_angle();
    line.start = rotate_about(start, mid, -angle);
    line.end = rotate_about(end, mid, -angle);
}
