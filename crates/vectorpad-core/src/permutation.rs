//! Handle permutation under rotation and mirroring.
//!
//! A corner handle grabbed on screen is not necessarily the same logical
//! corner once a shape has been turned. Two separate tables resolve this:
//! [`contains_rotator`] for plain figures and [`r2_permute`] for pictures,
//! whose quadrant is taken from a reference vertex so that flips are seen.

use crate::vector::{declination, quadrant};
use crate::widget::Corner;
use kurbo::Point;

/// Shift a logical corner by the quarter-turn band of `angle`.
///
/// The offset is `0` for `[-PI/4, PI/4)`, `-1` for `[PI/4, 3PI/4)`, `-2` for
/// `[3PI/4, PI]` and `[-PI, -3PI/4)`, `-3` for `[-3PI/4, -PI/4)`. The canonical
/// list `TL, BL, BR, TR` is shifted by that offset, wrapping.
pub fn contains_rotator(corner: Corner, angle: f64) -> Corner {
    let offset = -(quadrant(angle) as i64);
    let index = (corner.index() as i64 + offset).rem_euclid(4);
    Corner::from_index(index as usize)
}

/// Logical corner occupying the visual slot `slot` when the reference vertex
/// sits in `quadrant`.
pub fn r2_permute(slot: Corner, quadrant: usize) -> Corner {
    use Corner::*;
    match (quadrant % 4, slot) {
        (0, c) => c,
        (1, TopLeft) => BottomLeft,
        (1, BottomLeft) => BottomRight,
        (1, BottomRight) => TopRight,
        (1, TopRight) => TopLeft,
        (2, TopLeft) => BottomRight,
        (2, BottomLeft) => TopRight,
        (2, BottomRight) => TopLeft,
        (2, TopRight) => BottomLeft,
        (_, TopLeft) => TopRight,
        (_, BottomLeft) => TopLeft,
        (_, BottomRight) => BottomLeft,
        (_, TopRight) => BottomRight,
    }
}

/// Quadrant of `vertex` around `centre`, measured from the direction the
/// vertex has when the shape is unrotated (`baseline`, a polar angle).
pub fn vertex_quadrant(vertex: Point, centre: Point, baseline: f64) -> usize {
    let d = vertex - centre;
    quadrant(declination(d.x, d.y) - baseline)
}
