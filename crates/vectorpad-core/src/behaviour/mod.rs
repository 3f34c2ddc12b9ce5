//! Pointer behaviour per shape kind.
//!
//! Two operations drive every drag gesture: [`select_handle`] on pointer-down
//! records what was grabbed in the [`InteractionContext`], and [`alter`]
//! applies each pointer step to the shape. Steps are incremental: each one is
//! relative to the shape as the previous step left it.

mod figure;
mod group;
mod line;
mod picture;
mod text;

use crate::config::GeometryConfig;
use crate::error::GeometryResult;
use crate::selection::InteractionContext;
use crate::shapes::{Shape, ShapeKind, TextLayout};
use crate::widget::{EditingKind, HandleKind, WidgetState};
use kurbo::{Point, Vec2};

/// Collaborators consulted while altering a shape.
#[derive(Clone, Copy)]
pub struct AlterEnv<'a> {
    pub config: &'a GeometryConfig,
    pub layout: &'a dyn TextLayout,
}

impl<'a> AlterEnv<'a> {
    pub fn new(config: &'a GeometryConfig, layout: &'a dyn TextLayout) -> Self {
        Self { config, layout }
    }
}

/// Test `pointer` against the shape's handles, then its body.
///
/// On a hit the handle is stored in `ctx` and the shape is marked selected
/// (text enters editing). Returns `false` when nothing is under the pointer.
pub fn select_handle(
    shape: &mut Shape,
    ctx: &mut InteractionContext,
    pointer: Point,
    env: &AlterEnv<'_>,
) -> bool {
    let handle = match shape.kind() {
        ShapeKind::Line => line::select_handle(shape, pointer, env.config),
        ShapeKind::Picture => picture::select_handle(shape, ctx, pointer, env.config),
        ShapeKind::Text => text::select_handle(shape, pointer, env),
        ShapeKind::Group => group::select_handle(shape, pointer, env.config),
        _ => figure::select_handle(shape, pointer, env.config),
    };

    let Some(handle) = handle else {
        return false;
    };
    ctx.handle = Some(handle);
    let state = if shape.kind() == ShapeKind::Text {
        WidgetState::Editing(EditingKind::Text)
    } else {
        WidgetState::Selected
    };
    shape.set_widget_state(state);
    log::debug!("{:?} {} grabbed at {handle:?}", shape.kind(), shape.id());
    true
}

/// Apply one drag step to the shape through the handle recorded in `ctx`.
///
/// A context without a handle makes this a no-op. Unsupported handle/kind
/// combinations are reported as [`crate::GeometryError::InvalidKindTransition`].
pub fn alter(
    shape: &mut Shape,
    ctx: &mut InteractionContext,
    delta: Vec2,
    env: &AlterEnv<'_>,
) -> GeometryResult<()> {
    let Some(handle) = ctx.handle else {
        return Ok(());
    };
    if !delta.is_finite() {
        log::trace!("ignoring non-finite drag step {delta:?}");
        return Ok(());
    }

    match shape {
        Shape::Line(l) => line::alter(l, handle, delta, env.config),
        Shape::Figure(f) => figure::alter(f, handle, delta, env.config),
        Shape::Sketch(s) => figure::alter(s, handle, delta, env.config),
        Shape::Picture(p) => picture::alter(p, ctx, handle, delta, env.config),
        Shape::Text(t) => text::alter(t, ctx, handle, env),
        Shape::Group(g) => group::alter(g, handle, delta),
    }
}

/// Error for a handle that makes no sense on `kind`.
fn unsupported(kind: ShapeKind, handle: HandleKind) -> crate::error::GeometryError {
    let operation = match handle {
        HandleKind::Corner(_) => "corner resize",
        HandleKind::Endpoint(_) => "endpoint drag",
        HandleKind::Body => "body drag",
    };
    log::warn!("{operation} rejected for {kind:?}");
    crate::error::GeometryError::InvalidKindTransition { kind, operation }
}
