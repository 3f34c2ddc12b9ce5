//! Group: hover and whole-group move only.

use super::unsupported;
use crate::config::GeometryConfig;
use crate::error::GeometryResult;
use crate::hit::{contains, handle_at};
use crate::shapes::{Group, Shape, ShapeKind, ShapeTrait};
use crate::widget::HandleKind;
use kurbo::{Point, Vec2};

/// Corners are still reported so the caller can tell a resize attempt from a
/// miss; altering through one is rejected.
pub(super) fn select_handle(shape: &Shape, pointer: Point, config: &GeometryConfig) -> Option<HandleKind> {
    if let Some(corner) = handle_at(shape, pointer, config) {
        return Some(HandleKind::Corner(corner));
    }
    contains(shape, pointer, config).then_some(HandleKind::Body)
}

pub(super) fn alter(group: &mut Group, handle: HandleKind, delta: Vec2) -> GeometryResult<()> {
    match handle {
        HandleKind::Body => {
            group.translate(delta);
            log::trace!("group {} moved by {delta:?}", group.id());
            Ok(())
        }
        _ => Err(unsupported(ShapeKind::Group, handle)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;
    use crate::shapes::Figure;
    use crate::widget::Corner;

    fn group() -> Group {
        Group::new(vec![
            Figure::rectangle(Point::new(0.0, 0.0), Point::new(100.0, 50.0)).into(),
            Figure::ellipse(Point::new(200.0, 200.0), Point::new(250.0, 300.0)).into(),
        ])
    }

    #[test]
    fn test_select() {
        let config = GeometryConfig::default();
        let shape: Shape = group().into();
        assert_eq!(select_handle(&shape, Point::new(50.0, 25.0), &config), Some(HandleKind::Body));
        assert_eq!(
            select_handle(&shape, Point::new(249.0, 299.0), &config),
            Some(HandleKind::Corner(Corner::BottomRight))
        );
        assert_eq!(select_handle(&shape, Point::new(150.0, 120.0), &config), None);
    }

    #[test]
    fn test_move_keeps_members() {
        let mut g = group();
        alter(&mut g, HandleKind::Body, Vec2::new(5.0, 5.0)).unwrap();
        assert_eq!(g.len(), 2);
        assert!((g.start() - Point::new(5.0, 5.0)).hypot() < 1e-9);
        let child = g.children()[0].screen_corners()[0];
        assert!((child - Point::new(5.0, 5.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_corner_resize_rejected() {
        let mut g = group();
        let err = alter(&mut g, HandleKind::Corner(Corner::TopLeft), Vec2::new(1.0, 1.0)).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::InvalidKindTransition {
                kind: ShapeKind::Group,
                ..
            }
        ));
        assert!((g.start() - Point::ZERO).hypot() < 1e-9);
    }
}
