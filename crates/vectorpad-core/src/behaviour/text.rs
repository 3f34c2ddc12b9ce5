//! Text: dragging extends the caret selection instead of resizing.

use super::{AlterEnv, unsupported};
use crate::error::GeometryResult;
use crate::hit::contains;
use crate::selection::InteractionContext;
use crate::shapes::{Shape, ShapeKind, Text, TextSelection};
use crate::widget::HandleKind;
use kurbo::Point;

/// A hit on the block places a collapsed caret under the pointer.
pub(super) fn select_handle(shape: &mut Shape, pointer: Point, env: &AlterEnv<'_>) -> Option<HandleKind> {
    if !contains(shape, pointer, env.config) {
        return None;
    }
    let Shape::Text(text) = shape else {
        return None;
    };
    text.selection = TextSelection::caret(text.offset_at(env.layout, pointer));
    Some(HandleKind::Body)
}

/// Move the selection extent to the character under the latest pointer
/// position in `ctx`.
pub(super) fn alter(
    text: &mut Text,
    ctx: &InteractionContext,
    handle: HandleKind,
    env: &AlterEnv<'_>,
) -> GeometryResult<()> {
    if handle != HandleKind::Body {
        return Err(unsupported(ShapeKind::Text, handle));
    }
    text.selection.extent = text.offset_at(env.layout, ctx.current_point);
    log::trace!("text {} selection {:?}", text.id, text.selection.range());
    Ok(())
}
