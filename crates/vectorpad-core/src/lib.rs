//! VectorPad Core Library
//!
//! Geometry core of the VectorPad drawing surface: shapes, path construction
//! and curve fitting, hit-testing, and the drag behaviour that resizes,
//! moves and rotates shapes under the pointer.

pub mod behaviour;
pub mod canvas;
pub mod config;
pub mod error;
pub mod hit;
pub mod path;
pub mod permutation;
pub mod selection;
pub mod shapes;
pub mod snap;
pub mod vector;
pub mod widget;

pub use behaviour::{AlterEnv, alter, select_handle};
pub use canvas::{Canvas, Document};
pub use config::GeometryConfig;
pub use error::{GeometryError, GeometryResult};
pub use hit::{contains, handle_at};
pub use permutation::{contains_rotator, r2_permute};
pub use selection::{InteractionContext, apply_rotation};
pub use shapes::{
    ApproximateLayout, Figure, FigureKind, Group, ImageFormat, Line, Picture, Shape, ShapeId, ShapeKind,
    ShapeStyle, ShapeTrait, Sketch, Text, TextLayout, TextSelection,
};
pub use snap::snap_to_grid;
pub use widget::{Corner, CornerHandle, EditingKind, HandleKind, WidgetState};
