//! Picture: aspect-preserving corner scale, mirroring, snapped moves.
//!
//! Handles are hit by visual slot. The slot is mapped to the logical corner
//! through the R2 table of the gesture's reference-vertex quadrant. The screen
//! delta is turned into the picture's own frame, negated for mirrored
//! pictures and projected onto the grabbed diagonal, so only `scale` changes.
//! The corner diagonally opposite the grabbed one stays put on screen.

use super::unsupported;
use crate::config::GeometryConfig;
use crate::error::GeometryResult;
use crate::hit::{contains, corner_handle};
use crate::permutation::{r2_permute, vertex_quadrant};
use crate::selection::InteractionContext;
use crate::shapes::{Picture, Shape, ShapeKind, ShapeTrait};
use crate::snap::snapped_delta;
use crate::vector::{declination, dot, normalize_angle, quarter_turns, rotate_vec};
use crate::widget::{Corner, HandleKind};
use kurbo::{Point, Vec2};
use std::f64::consts::FRAC_PI_2;

pub(super) fn select_handle(
    shape: &Shape,
    ctx: &mut InteractionContext,
    pointer: Point,
    config: &GeometryConfig,
) -> Option<HandleKind> {
    let Shape::Picture(picture) = shape else {
        return None;
    };
    let (quadrant, _) = resolve(picture, ctx);
    for slot in Corner::ALL {
        let logical = r2_permute(slot, quadrant);
        if corner_handle(shape, logical, config).hit_test(pointer) {
            return Some(HandleKind::Corner(slot));
        }
    }
    contains(shape, pointer, config).then_some(HandleKind::Body)
}

pub(super) fn alter(
    picture: &mut Picture,
    ctx: &mut InteractionContext,
    handle: HandleKind,
    delta: Vec2,
    config: &GeometryConfig,
) -> GeometryResult<()> {
    match handle {
        HandleKind::Corner(slot) => {
            resize(picture, ctx, slot, delta, config);
            Ok(())
        }
        HandleKind::Body => {
            move_body(picture, ctx, delta, config);
            Ok(())
        }
        HandleKind::Endpoint(_) => Err(unsupported(ShapeKind::Picture, handle)),
    }
}

/// Quadrant and mirroring for this gesture, computed on first use.
fn resolve(picture: &Picture, ctx: &mut InteractionContext) -> (usize, bool) {
    let quadrant = *ctx.quadrant.get_or_insert_with(|| reference_quadrant(picture));
    let mirrored = *ctx.mirrored.get_or_insert_with(|| picture.is_mirrored());
    (quadrant, mirrored)
}

/// Quadrant of the unflipped top-left vertex around the centre, relative to
/// where that vertex sits when the picture is not rotated.
fn reference_quadrant(picture: &Picture) -> usize {
    let centre = picture.rotation_centre();
    let vertex = centre - picture.size() / 2.0;
    let baseline = declination(-picture.end.x, -picture.end.y);
    vertex_quadrant(picture.transform() * vertex, centre, baseline)
}

fn resize(picture: &mut Picture, ctx: &mut InteractionContext, slot: Corner, delta: Vec2, config: &GeometryConfig) {
    let (quadrant, mirrored) = resolve(picture, ctx);
    let corner = r2_permute(slot, quadrant);
    let raw = picture.end;
    let raw_len = raw.hypot();
    if raw.x.abs() < f64::EPSILON || raw.y.abs() < f64::EPSILON {
        log::trace!("picture {} has no extent, scale unchanged", picture.id());
        return;
    }

    // Into the picture frame: residual first, then whole quarter turns.
    let residual = normalize_angle(picture.effective_angle() - quadrant as f64 * FRAC_PI_2);
    let mut local = quarter_turns(rotate_vec(delta, -residual), (4 - quadrant) % 4);
    if mirrored {
        local = -local;
    }

    let diagonal = match corner {
        Corner::TopLeft | Corner::BottomRight => raw,
        Corner::TopRight | Corner::BottomLeft => Vec2::new(raw.x, -raw.y),
    };
    let d = diagonal * (dot(local, diagonal) / dot(diagonal, diagonal));

    let mut start = picture.start;
    let mut end = picture.scaled_end();
    match corner {
        Corner::TopLeft => start += d,
        Corner::BottomRight => end += d,
        Corner::TopRight => {
            start.y += d.y;
            end.x += d.x;
        }
        Corner::BottomLeft => {
            start.x += d.x;
            end.y += d.y;
        }
    }

    let span = end - start;
    let along = dot(span, raw);
    let scale = span.hypot() / raw_len * along.signum();
    if along == 0.0 || scale.signum() != picture.scale.signum() {
        log::trace!("picture {} would flip, scale unchanged", picture.id());
        return;
    }
    if scale.abs() * raw.x.abs().min(raw.y.abs()) < config.min_shape_size {
        log::trace!("picture {} at minimum size", picture.id());
        return;
    }

    let pinned = corner.opposite().index();
    let before = picture.screen_corners()[pinned];
    picture.start = start;
    picture.scale = scale;
    let after = picture.screen_corners()[pinned];
    picture.start += before - after;
    picture.rebuild_path(config);
    log::trace!(
        "picture {} scaled to {scale:.4} via {slot:?} (as {corner:?}, q{quadrant}, mirrored {mirrored})",
        picture.id()
    );
}

fn move_body(picture: &mut Picture, ctx: &mut InteractionContext, delta: Vec2, config: &GeometryConfig) {
    if !config.snap_to_grid {
        picture.translate(delta);
        return;
    }
    let raw = ctx.unsnapped.get_or_insert(picture.start);
    *raw += delta;
    let target = *raw;
    picture.translate(snapped_delta(picture.start, target, config.grid_size));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn config() -> GeometryConfig {
        GeometryConfig::default()
    }

    fn context(picture: &Picture) -> InteractionContext {
        InteractionContext::new(0, Point::ZERO, picture.clone().into())
    }

    #[test]
    fn test_bottom_right_keeps_aspect() {
        let mut picture = Picture::new(Point::new(100.0, 100.0), 200.0, 100.0);
        let mut ctx = context(&picture);
        let slot = HandleKind::Corner(Corner::BottomRight);
        alter(&mut picture, &mut ctx, slot, Vec2::new(10.0, 10.0), &config()).unwrap();
        assert!((picture.scale - 1.06).abs() < 1e-9);
        let size = picture.size();
        assert!((size.x / size.y - 2.0).abs() < 1e-9);
        assert!((picture.start - Point::new(100.0, 100.0)).hypot() < 1e-9);
        assert_eq!(ctx.quadrant, Some(0));
        assert_eq!(ctx.mirrored, Some(false));
    }

    #[test]
    fn test_mirrored_scale_moves_the_other_way() {
        let mut plain = Picture::new(Point::new(100.0, 100.0), 200.0, 100.0);
        let mut mirrored = Picture::new(Point::new(300.0, 200.0), 200.0, 100.0).with_scale(-1.0);
        let slot = HandleKind::Corner(Corner::BottomRight);
        let delta = Vec2::new(10.0, 10.0);

        let mut ctx = context(&plain);
        alter(&mut plain, &mut ctx, slot, delta, &config()).unwrap();
        let mut ctx = context(&mirrored);
        alter(&mut mirrored, &mut ctx, slot, delta, &config()).unwrap();

        assert_eq!(ctx.mirrored, Some(true));
        assert!(plain.scale > 1.0);
        assert!(mirrored.scale < -1.0);
        assert!((mirrored.scale + 1.06).abs() < 1e-9);
        // The displayed top-left corner stays where it was.
        let frame = mirrored.frame();
        assert!((frame.x0 - 100.0).abs() < 1e-9 && (frame.y0 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_shrinking_top_left_pins_bottom_right() {
        let mut picture = Picture::new(Point::new(0.0, 0.0), 200.0, 100.0);
        let mut ctx = context(&picture);
        let slot = HandleKind::Corner(Corner::TopLeft);
        alter(&mut picture, &mut ctx, slot, Vec2::new(20.0, 10.0), &config()).unwrap();
        assert!((picture.scale - 0.9).abs() < 1e-9);
        assert!((picture.scaled_end() - Point::new(200.0, 100.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_quarter_turn_uses_visual_slot() {
        let mut picture = Picture::new(Point::new(0.0, 0.0), 200.0, 100.0);
        picture.set_angle(FRAC_PI_2);
        let shape: Shape = picture.clone().into();
        let mut ctx = context(&picture);

        // Logical bottom-right is drawn at the visual bottom-left.
        let br = shape.screen_corners()[Corner::BottomRight.index()];
        assert_eq!(
            select_handle(&shape, &mut ctx, br, &config()),
            Some(HandleKind::Corner(Corner::BottomLeft))
        );
        assert_eq!(ctx.quadrant, Some(1));

        let tl_before = shape.screen_corners()[Corner::TopLeft.index()];
        alter(&mut picture, &mut ctx, HandleKind::Corner(Corner::BottomLeft), Vec2::new(-6.0, 12.0), &config())
            .unwrap();
        assert!((picture.scale - 1.06).abs() < 1e-9);
        let tl_after = picture.screen_corners()[Corner::TopLeft.index()];
        assert!((tl_after - tl_before).hypot() < 1e-9);
    }

    #[test]
    fn test_half_turn_quadrant() {
        let mut picture = Picture::new(Point::new(0.0, 0.0), 200.0, 100.0);
        picture.set_angle(PI);
        let mut ctx = context(&picture);
        assert_eq!(resolve(&picture, &mut ctx).0, 2);
        // Visual top-left is the logical bottom-right after a half turn.
        alter(&mut picture, &mut ctx, HandleKind::Corner(Corner::TopLeft), Vec2::new(-10.0, -10.0), &config())
            .unwrap();
        assert!((picture.scale - 1.06).abs() < 1e-9);
    }

    #[test]
    fn test_cannot_flip_or_collapse() {
        let mut picture = Picture::new(Point::new(0.0, 0.0), 20.0, 10.0);
        let mut ctx = context(&picture);
        let slot = HandleKind::Corner(Corner::BottomRight);
        alter(&mut picture, &mut ctx, slot, Vec2::new(-40.0, -20.0), &config()).unwrap();
        assert_eq!(picture.scale, 1.0);

        let mut flat = Picture::new(Point::new(0.0, 0.0), 20.0, 0.0);
        let mut ctx = context(&flat);
        alter(&mut flat, &mut ctx, slot, Vec2::new(5.0, 5.0), &config()).unwrap();
        assert_eq!(flat.scale, 1.0);
    }

    #[test]
    fn test_snapped_move_accumulates() {
        let mut picture = Picture::new(Point::new(0.0, 0.0), 20.0, 10.0);
        let mut ctx = context(&picture);
        let config = GeometryConfig {
            snap_to_grid: true,
            ..GeometryConfig::default()
        };
        for _ in 0..2 {
            alter(&mut picture, &mut ctx, HandleKind::Body, Vec2::new(6.0, 0.0), &config).unwrap();
        }
        // 6 stays on the origin, 12 rounds up to the next grid line.
        assert_eq!(picture.start, Point::new(20.0, 0.0));
        assert_eq!(ctx.unsnapped, Some(Point::new(12.0, 0.0)));
    }
}
